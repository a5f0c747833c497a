//! Identifier/secret pair presented for a single authentication attempt.

use secrecy::SecretString;
use std::fmt;

use super::error::CredentialError;

/// Decoded credentials. The secret is never printed by `Debug`.
pub struct Credential {
    identifier: String,
    secret: SecretString,
}

impl Credential {
    /// Build a credential from already-decoded parts.
    ///
    /// # Errors
    /// Returns an error if the identifier or the secret is empty.
    pub fn new(
        identifier: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let identifier = identifier.into();
        let secret = secret.into();

        if identifier.is_empty() {
            return Err(CredentialError::EmptyIdentifier);
        }

        if secret.is_empty() {
            return Err(CredentialError::EmptySecret);
        }

        Ok(Self {
            identifier,
            secret: SecretString::from(secret),
        })
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("secret", &"***")
            .finish()
    }
}
