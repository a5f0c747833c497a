//! Argon2id secret verification against PHC-encoded hashes.
//!
//! Hashes carry their own parameters and salt. An optional server-side pepper
//! is passed to Argon2 as its secret input; a pepper change invalidates every
//! stored hash.

use anyhow::{Result, anyhow};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{self, SaltString},
};
use async_trait::async_trait;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use tracing::instrument;

use crate::gate::{SecretVerifier, VerificationError};
use crate::store::User;

#[derive(Clone, Default)]
pub struct Argon2Verifier {
    pepper: Option<SecretString>,
}

impl Argon2Verifier {
    /// An empty pepper is the same as no pepper.
    #[must_use]
    pub fn new(pepper: Option<SecretString>) -> Self {
        Self {
            pepper: pepper.filter(|pepper| !pepper.expose_secret().is_empty()),
        }
    }

    /// Hash a password into a PHC string with a fresh random salt.
    ///
    /// # Errors
    /// Returns an error if Argon2 cannot be initialized or hashing fails.
    pub fn hash_password(&self, password: &SecretString) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = argon2(self.pepper.as_ref())
            .map_err(|_| anyhow!("failed to initialize Argon2id"))?;
        let hash = argon2
            .hash_password(password.expose_secret().as_bytes(), &salt)
            .map_err(|_| anyhow!("failed to hash password"))?
            .to_string();
        Ok(hash)
    }
}

impl fmt::Debug for Argon2Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Argon2Verifier")
            .field("pepper", &self.pepper.as_ref().map(|_| "***"))
            .finish()
    }
}

#[async_trait]
impl SecretVerifier<User> for Argon2Verifier {
    #[instrument(skip_all, fields(user_id = %principal.id))]
    async fn verify(
        &self,
        principal: &User,
        secret: &SecretString,
    ) -> Result<bool, VerificationError> {
        let pepper = self.pepper.clone();
        let hash = principal.password_hash.clone();
        let secret = secret.clone();

        // Argon2 is CPU bound, keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            verify_blocking(pepper.as_ref(), hash.expose_secret(), secret.expose_secret())
        })
        .await?
    }
}

fn argon2(pepper: Option<&SecretString>) -> Result<Argon2<'_>, VerificationError> {
    match pepper {
        Some(pepper) => Argon2::new_with_secret(
            pepper.expose_secret().as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|err| VerificationError::Config(err.to_string())),
        None => Ok(Argon2::default()),
    }
}

fn verify_blocking(
    pepper: Option<&SecretString>,
    hash: &str,
    secret: &str,
) -> Result<bool, VerificationError> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| VerificationError::MalformedHash(err.to_string()))?;

    match argon2(pepper)?.verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(VerificationError::MalformedHash(err.to_string())),
    }
}
