//! Principal store backends.

pub mod memory;
pub mod postgres;

pub use memory::{MemoryUserStore, UsersFileError};
pub use postgres::PgUserStore;

use secrecy::SecretString;
use std::fmt;
use uuid::Uuid;

/// Principal record used by the service.
#[derive(Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// PHC-encoded Argon2 hash.
    pub password_hash: SecretString,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"***")
            .finish()
    }
}
