//! User service: registration, login, profiles

use shared::error::{AppError, ErrorCode, FieldError};
use shared::models::{
    AuthResponse, LoginRequest, NewUser, User, UserProfile, UserRegister, UserType, UserUpdate,
};

use crate::auth::{hash_password, user_for_token, verify_password};
use crate::db::RepoError;
use crate::error::{ServiceError, ServiceResult};
use crate::security_log;
use crate::state::AppState;
use crate::validation;

fn email_taken() -> AppError {
    AppError::fields_rejected(
        ErrorCode::EmailAlreadyRegistered,
        vec![FieldError::new("email", "The email is already in use")],
    )
}

/// Register a customer or an owner and log them in
pub async fn register(
    state: &AppState,
    data: UserRegister,
    user_type: UserType,
) -> ServiceResult<AuthResponse> {
    validation::validate_register(&data)?;

    let email = data.email.trim().to_lowercase();
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(email_taken().into());
    }

    let password_hash =
        hash_password(&data.password).map_err(|e| ServiceError::Db(e.to_string().into()))?;

    let user = state
        .users
        .create(NewUser {
            first_name: data.first_name,
            last_name: data.last_name,
            email,
            phone: data.phone,
            address: data.address,
            postal_code: data.postal_code,
            avatar: data.avatar,
            user_type,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => ServiceError::App(email_taken()),
            other => ServiceError::from(other),
        })?;

    tracing::info!(user_id = user.id, user_type = %user.user_type, "User registered");
    issue_token(state, user)
}

/// Log in with email and password for the given account type
///
/// Unknown email, wrong password and wrong account type all fail with the
/// same error.
pub async fn login(
    state: &AppState,
    data: LoginRequest,
    user_type: UserType,
) -> ServiceResult<AuthResponse> {
    let email = data.email.trim().to_lowercase();
    let user = state.users.find_by_email(&email).await?;

    let user = match user {
        Some(u) if u.user_type == user_type && verify_password(&data.password, &u.password_hash) => {
            u
        }
        _ => {
            security_log!(
                WARN,
                "login_failed",
                email = %email,
                user_type = %user_type
            );
            return Err(AppError::invalid_credentials().into());
        }
    };

    security_log!(INFO, "login_success", user_id = user.id, user_type = %user.user_type);
    issue_token(state, user)
}

pub async fn profile(state: &AppState, id: i64) -> ServiceResult<UserProfile> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(user.into())
}

/// Update the profile of the logged-in user
pub async fn update(state: &AppState, current: &User, data: UserUpdate) -> ServiceResult<User> {
    validation::validate_user_update(&data)?;

    let mut user = current.clone();
    data.apply_to(&mut user);
    let updated = state.users.update(&user).await?;

    tracing::info!(user_id = updated.id, "User profile updated");
    Ok(updated)
}

/// Delete the logged-in user's account
///
/// Owners must delete their restaurants first, and customers with orders
/// keep their account; both fail with a conflict.
pub async fn delete(state: &AppState, user: &User) -> ServiceResult<()> {
    if !state.users.delete(user.id).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }
    security_log!(INFO, "account_deleted", user_id = user.id, user_type = %user.user_type);
    Ok(())
}

/// Account behind `token`, for clients restoring a stored session
pub async fn token_owner(state: &AppState, token: &str) -> ServiceResult<User> {
    Ok(user_for_token(state, token).await?)
}

fn issue_token(state: &AppState, user: User) -> ServiceResult<AuthResponse> {
    let issued = state
        .jwt
        .generate_token(user.id, user.user_type)
        .map_err(|e| ServiceError::Db(e.into()))?;
    Ok(AuthResponse {
        user,
        token: issued.token,
        token_expiration: issued.expires_at,
    })
}
