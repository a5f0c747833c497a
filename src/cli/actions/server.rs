use crate::{
    api,
    cli::commands::store,
    gate::{Gate, PrincipalStore},
    store::{postgres, MemoryUserStore, PgUserStore, User},
    verifier::Argon2Verifier,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub realm: String,
    pub store: store::Options,
    pub pepper: Option<SecretString>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the principal store cannot be opened or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let store = open_store(&args.store).await?;
    let verifier = Arc::new(Argon2Verifier::new(args.pepper));
    let gate = Arc::new(Gate::new(store, verifier));

    let app = api::router(gate, &args.realm)?;

    api::serve(args.port, app).await
}

async fn open_store(options: &store::Options) -> Result<Arc<dyn PrincipalStore<Principal = User>>> {
    match options {
        store::Options::Postgres { dsn } => {
            let pool = postgres::pool_options()
                .connect(dsn.expose_secret())
                .await
                .context("Failed to connect to database")?;

            Ok(Arc::new(PgUserStore::new(pool)))
        }
        store::Options::UsersFile { path } => {
            let users = MemoryUserStore::load(path)
                .await
                .with_context(|| format!("Failed to load users file {}", path.display()))?;

            if users.is_empty() {
                warn!("Users file {} has no users, every request will be rejected", path.display());
            }

            Ok(Arc::new(users))
        }
    }
}

fn log_startup_args(args: &Args) {
    let store = match &args.store {
        store::Options::Postgres { dsn } => format!("postgres {}", redact_dsn(dsn.expose_secret())),
        store::Options::UsersFile { path } => format!("file {}", path.display()),
    };
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("realm", args.realm.clone()),
        ("store", store),
        ("password_pepper_set", args.pepper.is_some().to_string()),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_dsn(dsn: &str) -> String {
    match Url::parse(dsn) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-dsn".to_string(),
    }
}

fn short_commit(hash: &str) -> String {
    hash.trim().chars().take(7).collect()
}
