//! In-memory user store loaded from a JSON users file.
//!
//! File format:
//!
//! ```json
//! [
//!   { "id": "0192...", "username": "alice", "password_hash": "$argon2id$v=19$..." }
//! ]
//! ```
//!
//! `id` is optional and generated when missing.

use argon2::PasswordHash;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{collections::HashMap, path::Path};
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use super::User;
use crate::gate::{PrincipalStore, StoreError};

#[derive(Debug, Error)]
pub enum UsersFileError {
    #[error("failed to read users file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid users file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty username in users file")]
    EmptyUsername,
    #[error("duplicate username in users file: {0}")]
    Duplicate(String),
    #[error("invalid password hash for user {username}: {reason}")]
    InvalidHash { username: String, reason: String },
}

#[derive(Deserialize)]
struct UserEntry {
    id: Option<Uuid>,
    username: String,
    password_hash: String,
}

impl From<UserEntry> for User {
    fn from(entry: UserEntry) -> Self {
        Self {
            id: entry.id.unwrap_or_else(Uuid::new_v4),
            username: entry.username,
            password_hash: SecretString::from(entry.password_hash),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore {
    users: HashMap<String, User>,
}

impl MemoryUserStore {
    /// Index users by username.
    ///
    /// # Errors
    /// Returns an error on empty or duplicate usernames, or on a password hash
    /// that is not a PHC string.
    pub fn new(users: impl IntoIterator<Item = User>) -> Result<Self, UsersFileError> {
        let mut indexed = HashMap::new();

        for user in users {
            if user.username.is_empty() {
                return Err(UsersFileError::EmptyUsername);
            }

            if indexed.contains_key(&user.username) {
                return Err(UsersFileError::Duplicate(user.username));
            }

            if let Err(err) = PasswordHash::new(user.password_hash.expose_secret()) {
                return Err(UsersFileError::InvalidHash {
                    username: user.username,
                    reason: err.to_string(),
                });
            }

            indexed.insert(user.username.clone(), user);
        }

        Ok(Self { users: indexed })
    }

    /// # Errors
    /// Returns an error if the JSON is invalid or the users are inconsistent.
    pub fn from_json(json: &str) -> Result<Self, UsersFileError> {
        let entries: Vec<UserEntry> = serde_json::from_str(json)?;
        Self::new(entries.into_iter().map(User::from))
    }

    /// Load a users file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    #[instrument]
    pub async fn load(path: &Path) -> Result<Self, UsersFileError> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| UsersFileError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let store = Self::from_json(&json)?;

        debug!("loaded {} users", store.len());

        Ok(store)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl PrincipalStore for MemoryUserStore {
    type Principal = User;

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(identifier).cloned())
    }
}
