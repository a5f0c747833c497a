//! Credential Gate.
//!
//! Flow Overview: look the identifier up in the principal store, verify the
//! secret against the found principal, then admit it. Every stage can stop the
//! pipeline early; the verifier only runs once a principal exists.

mod credential;
mod error;

pub use credential::Credential;
pub use error::{CredentialError, GateError, StoreError, VerificationError};

use async_trait::async_trait;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Source of principals, queried by identifier.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    type Principal: Send + Sync + 'static;

    /// `Ok(None)` means the identifier is unknown.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<Self::Principal>, StoreError>;

    /// Readiness probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Checks a presented secret against a principal.
#[async_trait]
pub trait SecretVerifier<P>: Send + Sync {
    /// `Ok(false)` is a mismatch, `Err` means verification could not run.
    async fn verify(&self, principal: &P, secret: &SecretString)
        -> Result<bool, VerificationError>;
}

/// Result of a single authentication attempt.
#[derive(Debug)]
pub enum Outcome<P> {
    Admitted(P),
    /// Unknown identifier or wrong secret; deliberately indistinguishable.
    Rejected,
    Failed(GateError),
}

impl<P> Outcome<P> {
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }

    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub struct Gate<P> {
    store: Arc<dyn PrincipalStore<Principal = P>>,
    verifier: Arc<dyn SecretVerifier<P>>,
}

impl<P: Send + Sync + 'static> Gate<P> {
    #[must_use]
    pub fn new(
        store: Arc<dyn PrincipalStore<Principal = P>>,
        verifier: Arc<dyn SecretVerifier<P>>,
    ) -> Self {
        Self { store, verifier }
    }

    /// Authenticate a credential against the store and the verifier.
    #[instrument(skip_all, fields(identifier = %credential.identifier()))]
    pub async fn authenticate(&self, credential: Credential) -> Outcome<P> {
        let principal = match self.store.find_by_identifier(credential.identifier()).await {
            Ok(Some(principal)) => principal,
            Ok(None) => {
                debug!("principal not found");
                return Outcome::Rejected;
            }
            Err(err) => {
                error!("Failed to lookup principal: {err}");
                return Outcome::Failed(err.into());
            }
        };

        match self.verifier.verify(&principal, credential.secret()).await {
            Ok(true) => {
                debug!("credentials verified");
                Outcome::Admitted(principal)
            }
            Ok(false) => {
                debug!("secret mismatch");
                Outcome::Rejected
            }
            Err(err) => {
                error!("Failed to verify secret: {err}");
                Outcome::Failed(err.into())
            }
        }
    }

    /// Probe the principal store; does not affect authentication.
    ///
    /// # Errors
    /// Returns the store error if the probe fails.
    pub async fn check_store(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

impl<P> Clone for Gate<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: Arc::clone(&self.verifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Record {
        name: String,
        secret: String,
    }

    #[derive(Default)]
    struct FakeStore {
        records: HashMap<String, Record>,
        down: bool,
        lookups: AtomicUsize,
    }

    impl FakeStore {
        fn with(name: &str, secret: &str) -> Self {
            let mut records = HashMap::new();
            records.insert(
                name.to_string(),
                Record {
                    name: name.to_string(),
                    secret: secret.to_string(),
                },
            );
            Self {
                records,
                ..Self::default()
            }
        }

        fn down(mut self) -> Self {
            self.down = true;
            self
        }
    }

    #[async_trait]
    impl PrincipalStore for FakeStore {
        type Principal = Record;

        async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Record>, StoreError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.down {
                return Err(StoreError::Unavailable("store is down".to_string()));
            }
            Ok(self.records.get(identifier).cloned())
        }
    }

    #[derive(Default)]
    struct FakeVerifier {
        broken: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SecretVerifier<Record> for FakeVerifier {
        async fn verify(
            &self,
            principal: &Record,
            secret: &SecretString,
        ) -> Result<bool, VerificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.broken {
                return Err(VerificationError::Unavailable("verifier is down".to_string()));
            }
            Ok(principal.secret == secret.expose_secret())
        }
    }

    fn gate(store: &Arc<FakeStore>, verifier: &Arc<FakeVerifier>) -> Gate<Record> {
        Gate::new(store.clone(), verifier.clone())
    }

    fn credential(identifier: &str, secret: &str) -> Credential {
        match Credential::new(identifier, secret) {
            Ok(credential) => credential,
            Err(err) => panic!("invalid test credential: {err}"),
        }
    }

    #[tokio::test]
    async fn admits_exact_record_from_store() {
        let store = Arc::new(FakeStore::with("alice", "correct"));
        let verifier = Arc::new(FakeVerifier::default());

        let outcome = gate(&store, &verifier)
            .authenticate(credential("alice", "correct"))
            .await;

        match outcome {
            Outcome::Admitted(record) => assert_eq!(
                record,
                Record {
                    name: "alice".to_string(),
                    secret: "correct".to_string(),
                }
            ),
            other => panic!("expected admission, got {other:?}"),
        }
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let store = Arc::new(FakeStore::with("alice", "correct"));
        let verifier = Arc::new(FakeVerifier::default());

        let outcome = gate(&store, &verifier)
            .authenticate(credential("alice", "wrong"))
            .await;

        assert!(outcome.is_rejected());
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_identifier_skips_verifier() {
        let store = Arc::new(FakeStore::with("alice", "correct"));
        let verifier = Arc::new(FakeVerifier::default());

        let outcome = gate(&store, &verifier)
            .authenticate(credential("bob", "anything"))
            .await;

        assert!(outcome.is_rejected());
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn store_error_fails_without_verifying() {
        let store = Arc::new(FakeStore::with("alice", "correct").down());
        let verifier = Arc::new(FakeVerifier::default());

        for secret in ["correct", "wrong"] {
            let outcome = gate(&store, &verifier)
                .authenticate(credential("alice", secret))
                .await;
            assert!(
                matches!(outcome, Outcome::Failed(GateError::Store(_))),
                "expected store failure, got {outcome:?}"
            );
        }
        assert_eq!(verifier.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn verifier_error_fails() {
        let store = Arc::new(FakeStore::with("alice", "correct"));
        let verifier = Arc::new(FakeVerifier {
            broken: true,
            ..FakeVerifier::default()
        });

        for secret in ["correct", "wrong"] {
            let outcome = gate(&store, &verifier)
                .authenticate(credential("alice", secret))
                .await;
            assert!(
                matches!(outcome, Outcome::Failed(GateError::Verification(_))),
                "expected verification failure, got {outcome:?}"
            );
        }
    }

    #[tokio::test]
    async fn rejections_do_not_leak_cause() {
        let store = Arc::new(FakeStore::with("alice", "correct"));
        let verifier = Arc::new(FakeVerifier::default());
        let gate = gate(&store, &verifier);

        let unknown = gate.authenticate(credential("bob", "anything")).await;
        let mismatch = gate.authenticate(credential("alice", "wrong")).await;

        assert!(matches!(unknown, Outcome::Rejected));
        assert!(matches!(mismatch, Outcome::Rejected));
        assert_eq!(format!("{unknown:?}"), format!("{mismatch:?}"));
    }

    #[tokio::test]
    async fn attempts_are_independent() {
        let store = Arc::new(FakeStore::with("alice", "correct"));
        let verifier = Arc::new(FakeVerifier::default());
        let gate = gate(&store, &verifier);

        assert!(gate.authenticate(credential("alice", "wrong")).await.is_rejected());
        assert!(gate.authenticate(credential("alice", "correct")).await.is_admitted());
        assert!(gate.authenticate(credential("alice", "wrong")).await.is_rejected());
        assert_eq!(store.lookups.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn concurrent_attempts_share_nothing() {
        let store = Arc::new(FakeStore::with("alice", "correct"));
        let verifier = Arc::new(FakeVerifier::default());
        let gate = Arc::new(gate(&store, &verifier));

        let mut handles = Vec::new();
        for index in 0..16 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move {
                let secret = if index % 2 == 0 { "correct" } else { "wrong" };
                (index, gate.authenticate(credential("alice", secret)).await)
            }));
        }

        for handle in handles {
            let (index, outcome) = match handle.await {
                Ok(result) => result,
                Err(err) => panic!("task failed: {err}"),
            };
            assert_eq!(outcome.is_admitted(), index % 2 == 0);
        }
    }

    #[tokio::test]
    async fn check_store_uses_default_ping() {
        let store = Arc::new(FakeStore::default());
        let verifier = Arc::new(FakeVerifier::default());
        assert!(gate(&store, &verifier).check_store().await.is_ok());
    }
}
