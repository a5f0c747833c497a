//! # Credgate (HTTP Basic Credential Gate)
//!
//! `credgate` admits or rejects HTTP requests carrying Basic credentials.
//!
//! ## Credential Gate
//!
//! The [`gate::Gate`] runs a short-circuiting pipeline per request:
//!
//! 1. **Lookup:** the principal store is queried by identifier. A store error
//!    fails the attempt; an unknown identifier rejects it without running the
//!    verifier.
//! 2. **Verification:** the secret is verified against the found principal.
//!    A verifier error fails the attempt; a mismatch rejects it.
//! 3. **Admission:** the principal returned by the store is admitted.
//!
//! "Unknown user" and "wrong password" produce the same [`gate::Outcome::Rejected`]
//! and the same `401` challenge, so callers cannot probe for valid identifiers.
//!
//! ## Sessions
//!
//! Authentication is stateless: no cookie or token is issued, every request
//! carries its own credentials.

pub mod api;
pub mod cli;
pub mod gate;
pub mod store;
pub mod verifier;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
