//! Postgres-backed user store.

use async_trait::async_trait;
use secrecy::SecretString;
use sqlx::{Connection, PgPool, Row, postgres::PgPoolOptions};
use tokio::time::{Duration, timeout};
use tracing::{Instrument, info_span};

use super::User;
use crate::gate::{PrincipalStore, StoreError};

const ACQUIRE_TIMEOUT_SECONDS: u64 = 3;
const PING_TIMEOUT_SECONDS: u64 = 2;

/// Pool settings for the user store.
///
/// Acquiring a connection is bounded so lookups fail fast when the database
/// goes away.
#[must_use]
pub fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECONDS))
        .test_before_acquire(true)
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PrincipalStore for PgUserStore {
    type Principal = User;

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, StoreError> {
        let query = "SELECT id, username, password_hash FROM users WHERE username = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        row.map(|row| -> Result<User, StoreError> {
            Ok(User {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                password_hash: SecretString::from(row.try_get::<String, _>("password_hash")?),
            })
        })
        .transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );

        let probe = async {
            let mut conn = self.pool.acquire().instrument(acquire_span).await?;

            let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
            conn.ping().instrument(ping_span).await?;

            Ok::<(), StoreError>(())
        };

        timeout(Duration::from_secs(PING_TIMEOUT_SECONDS), probe)
            .await
            .map_err(|_| {
                StoreError::Unavailable(format!(
                    "ping timed out after {PING_TIMEOUT_SECONDS}s"
                ))
            })?
    }
}
