use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_PASSWORD_PEPPER: &str = "password-pepper";
pub const CMD_HASH_PASSWORD: &str = "hash-password";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PASSWORD_PEPPER)
                .long("password-pepper")
                .help("Server-side secret mixed into Argon2 password hashes")
                .env("CREDGATE_PASSWORD_PEPPER")
                .hide_env_values(true)
                .global(true),
        )
        .subcommand(
            Command::new(CMD_HASH_PASSWORD)
                .about("Read a password from stdin and print its Argon2id PHC hash"),
        )
}

#[must_use]
pub fn pepper(matches: &ArgMatches) -> Option<SecretString> {
    matches
        .get_one::<String>(ARG_PASSWORD_PEPPER)
        .map(|pepper| SecretString::from(pepper.clone()))
}
