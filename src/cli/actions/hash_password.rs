use crate::verifier::Argon2Verifier;
use anyhow::{Result, bail};
use secrecy::SecretString;
use std::io::{self, BufRead, Write};

#[derive(Debug)]
pub struct Args {
    pub pepper: Option<SecretString>,
}

/// Read one password line from stdin and print its PHC hash.
/// # Errors
/// Returns an error if stdin is empty or hashing fails.
pub fn execute(args: &Args) -> Result<()> {
    let stdin = io::stdin();
    let hash = hash_line(&mut stdin.lock(), &Argon2Verifier::new(args.pepper.clone()))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{hash}")?;

    Ok(())
}

fn hash_line<R: BufRead>(reader: &mut R, verifier: &Argon2Verifier) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("no password given on stdin");
    }

    verifier.hash_password(&SecretString::from(password.to_string()))
}
