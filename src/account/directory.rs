//! UserDirectory - key/user store used for registration and ownership checks
//!
//! The account service only ever reads through this interface; it never
//! writes users. Directory errors stay behind the service boundary - the
//! service maps `NotFound` into its own error type.

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("user with id: {0} not found")]
    NotFound(Uuid),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub document_number: String,
    pub birth_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Registration input; the directory assigns id and timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub document_number: String,
    pub birth_date: NaiveDate,
}

#[derive(Default)]
pub struct UserDirectory {
    users: DashMap<Uuid, User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, new_user: NewUser) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            document_number: new_user.document_number,
            birth_date: new_user.birth_date,
            created_at: Utc::now(),
        };
        self.users.insert(user.id, user.clone());
        user
    }

    pub fn resolve(&self, user_id: &Uuid) -> Result<User, DirectoryError> {
        self.users
            .get(user_id)
            .map(|entry| entry.value().clone())
            .ok_or(DirectoryError::NotFound(*user_id))
    }
}
