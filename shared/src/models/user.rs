//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::UnknownVariant;

/// Account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Customer,
    Owner,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Owner => "owner",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "owner" => Ok(Self::Owner),
            other => Err(UnknownVariant {
                kind: "user type",
                value: other.to_string(),
            }),
        }
    }
}

/// User entity (password hash is never serialized)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub avatar: Option<String>,
    pub user_type: UserType,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public profile, visible to anyone
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub user_type: UserType,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            email: user.email,
            avatar: user.avatar,
            user_type: user.user_type,
        }
    }
}

/// Registration payload (customer or owner, depending on the endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegister {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub avatar: Option<String>,
}

/// Data handed to the store when creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub avatar: Option<String>,
    pub user_type: UserType,
    pub password_hash: String,
}

/// Profile update payload for the logged-in user
///
/// Absent fields are left unchanged; `avatar: null` clears the avatar. The
/// email identifies the account and cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub avatar: Option<Option<String>>,
    pub email: Option<String>,
}

impl UserUpdate {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = last_name.trim().to_string();
        }
        if let Some(phone) = &self.phone {
            user.phone = phone.trim().to_string();
        }
        if let Some(address) = &self.address {
            user.address = address.trim().to_string();
        }
        if let Some(postal_code) = &self.postal_code {
            user.postal_code = postal_code.trim().to_string();
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = avatar.clone();
        }
    }
}

/// `PUT /users/isTokenValid` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCheck {
    pub token: String,
}

/// Login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login / registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
    pub token_expiration: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            first_name: "Ana".into(),
            last_name: "Ruiz".into(),
            email: "ana@example.com".into(),
            phone: "600000000".into(),
            address: "Calle Feria 1".into(),
            postal_code: "41003".into(),
            avatar: None,
            user_type: UserType::Owner,
            password_hash: "$argon2id$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("\"userType\":\"owner\""));
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut user: User = serde_json::from_value(serde_json::json!({
            "id": 3,
            "firstName": "Ana",
            "lastName": "Ruiz",
            "email": "ana@example.com",
            "phone": "600000000",
            "address": "Calle Feria 1",
            "postalCode": "41003",
            "avatar": "ana.png",
            "userType": "customer",
            "createdAt": "2026-01-01T00:00:00Z"
        }))
        .unwrap();

        let update: UserUpdate =
            serde_json::from_str(r#"{"firstName":" Eva ","avatar":null,"userType":"owner"}"#)
                .unwrap();
        update.apply_to(&mut user);

        assert_eq!(user.first_name, "Eva");
        assert_eq!(user.last_name, "Ruiz");
        assert!(user.avatar.is_none());
        assert_eq!(user.user_type, UserType::Customer);
    }

    #[test]
    fn test_user_type_parse() {
        assert_eq!("customer".parse::<UserType>().unwrap(), UserType::Customer);
        assert!("admin".parse::<UserType>().is_err());
    }
}
