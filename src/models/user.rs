//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// User ID (also used as document ID)
    pub user_id: u64,
    /// Unique login name
    pub username: String,
    /// PBKDF2 password hash (see `services::password`)
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}

/// User fields before an ID has been assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
}

impl NewUser {
    pub fn with_id(self, user_id: u64) -> User {
        User {
            user_id,
            username: self.username,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: self.created_at,
        }
    }
}
