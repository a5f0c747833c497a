use anyhow::{Result, anyhow};
use clap::{Arg, ArgGroup, Command};
use secrecy::SecretString;
use std::path::PathBuf;

pub const ARG_DSN: &str = "dsn";
pub const ARG_USERS_FILE: &str = "users-file";
pub const GROUP_STORE: &str = "store";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long("dsn")
                .help("Database connection string")
                .long_help(
                    "Postgres connection string. Users are looked up in the `users` table by username.",
                )
                .env("CREDGATE_DSN"),
        )
        .arg(
            Arg::new(ARG_USERS_FILE)
                .long("users-file")
                .help("JSON file with users to serve from memory")
                .env("CREDGATE_USERS_FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .group(
            ArgGroup::new(GROUP_STORE)
                .args([ARG_DSN, ARG_USERS_FILE])
                .required(true),
        )
}

/// Principal store selected on the command line.
#[derive(Debug)]
pub enum Options {
    Postgres { dsn: SecretString },
    UsersFile { path: PathBuf },
}

impl Options {
    /// # Errors
    /// Returns an error if neither `--dsn` nor `--users-file` is present.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        if let Some(dsn) = matches.get_one::<String>(ARG_DSN) {
            return Ok(Self::Postgres {
                dsn: SecretString::from(dsn.clone()),
            });
        }

        if let Some(path) = matches.get_one::<PathBuf>(ARG_USERS_FILE) {
            return Ok(Self::UsersFile { path: path.clone() });
        }

        Err(anyhow!(
            "missing required argument: --{ARG_DSN} or --{ARG_USERS_FILE}"
        ))
    }
}
