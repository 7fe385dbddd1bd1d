use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::models::{NewUser, User};

use super::PgStore;
use crate::db::{RepoError, RepoResult, UserRepository};

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, phone, address, \
    postal_code, avatar, user_type, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    phone: String,
    address: String,
    postal_code: String,
    avatar: Option<String>,
    user_type: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            postal_code: row.postal_code,
            avatar: row.avatar,
            user_type: row.user_type.parse()?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        row.map(User::try_from).transpose()
    }

    async fn create(&self, data: NewUser) -> RepoResult<User> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, phone, address,
                postal_code, avatar, user_type)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(&data.postal_code)
        .bind(&data.avatar)
        .bind(data.user_type.as_str())
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }
    async fn update(&self, user: &User) -> RepoResult<User> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET first_name = $2, last_name = $3, phone = $4, address = $5,
                postal_code = $6, avatar = $7
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.postal_code)
        .bind(&user.avatar)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| RepoError::NotFound(format!("user {}", user.id)))?
            .try_into()
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        // restaurants and orders keep the user row alive (foreign keys)
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
