//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to an action: hashing a password when the
//! `hash-password` subcommand is given, otherwise serving HTTP.

use crate::cli::actions::{Action, hash_password, server};
use crate::cli::commands::{ARG_PORT, ARG_REALM, password, store};
use anyhow::{Context, Result};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some((password::CMD_HASH_PASSWORD, sub_m)) = matches.subcommand() {
        return Ok(Action::HashPassword(hash_password::Args {
            pepper: password::pepper(sub_m).or_else(|| password::pepper(matches)),
        }));
    }

    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let realm = matches
        .get_one::<String>(ARG_REALM)
        .cloned()
        .context("missing required argument: --realm")?;

    Ok(Action::Server(server::Args {
        port,
        realm,
        store: store::Options::parse(matches)?,
        pepper: password::pepper(matches),
    }))
}
