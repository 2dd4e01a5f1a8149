use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User row as stored in the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub full_name: String,
    /// bcrypt hash, never serialized
    pub password_hash: String,
    pub age: i64,
    pub address: String,
    pub birth_date: String,
    pub contact_no: String,
    /// Prepaid balance used to pay rentals
    pub deposit: i64,
    pub created_at: DateTime<Utc>,
}

/// User model for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub age: i64,
    pub address: String,
    pub birth_date: String,
    pub contact_no: String,
    pub deposit: i64,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            age: user.age,
            address: user.address,
            birth_date: user.birth_date,
            contact_no: user.contact_no,
            deposit: user.deposit,
        }
    }
}

impl User {
    /// Minimal email shape check: something on both sides of a single `@`
    pub fn validate_email(email: &str) -> bool {
        match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        }
    }

    /// Usernames are non-empty and free of whitespace
    pub fn validate_username(username: &str) -> bool {
        !username.is_empty() && !username.chars().any(char::is_whitespace)
    }
}
