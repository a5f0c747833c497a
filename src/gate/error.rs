use thiserror::Error;

/// The principal store could not complete a lookup.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("principal store unavailable: {0}")]
    Unavailable(String),
}

/// The secret verifier could not complete; a mismatch is not an error.
#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("malformed secret hash: {0}")]
    MalformedHash(String),
    #[error("invalid verifier configuration: {0}")]
    Config(String),
    #[error("verification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("secret verifier unavailable: {0}")]
    Unavailable(String),
}

/// Cause carried by [`super::Outcome::Failed`].
#[derive(Debug, Error)]
pub enum GateError {
    #[error("principal lookup failed")]
    Store(#[from] StoreError),
    #[error("secret verification failed")]
    Verification(#[from] VerificationError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("empty identifier")]
    EmptyIdentifier,
    #[error("empty secret")]
    EmptySecret,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn gate_error_keeps_source() {
        let err = GateError::from(StoreError::Unavailable("connection refused".to_string()));
        assert_eq!(err.to_string(), "principal lookup failed");
        assert_eq!(
            err.source().map(ToString::to_string),
            Some("principal store unavailable: connection refused".to_string())
        );

        let err = GateError::from(VerificationError::MalformedHash("bad".to_string()));
        assert_eq!(err.to_string(), "secret verification failed");
        assert!(err.source().is_some());
    }
}
