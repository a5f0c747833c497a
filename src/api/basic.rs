//! HTTP Basic binding for the credential gate.
//!
//! Flow Overview: decode the `Authorization: Basic` header into a credential,
//! run the gate, then either forward the request with the admitted principal in
//! its extensions or answer with a challenge / server error. Nothing is stored
//! between requests.

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, InvalidHeaderValue, WWW_AUTHENTICATE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64ct::{Base64, Encoding};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::gate::{Credential, CredentialError, Gate, Outcome};

pub const DEFAULT_REALM: &str = "Users";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BasicAuthError {
    #[error("missing authorization header")]
    Missing,
    #[error("unsupported authorization scheme")]
    UnsupportedScheme,
    #[error("malformed authorization header")]
    Malformed,
    #[error("incomplete credentials: {0}")]
    Incomplete(#[from] CredentialError),
}

impl BasicAuthError {
    /// Malformed headers are a client error; everything else gets a challenge.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Malformed => StatusCode::BAD_REQUEST,
            Self::Missing | Self::UnsupportedScheme | Self::Incomplete(_) => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

/// Decode `Authorization: Basic base64(identifier:secret)`.
///
/// The identifier ends at the first `:`; the secret may contain `:`.
///
/// # Errors
/// Returns a [`BasicAuthError`] describing why no credential could be built.
pub fn credential_from_headers(headers: &HeaderMap) -> Result<Credential, BasicAuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(BasicAuthError::Missing)?
        .to_str()
        .map_err(|_| BasicAuthError::Malformed)?;

    let (scheme, encoded) = value
        .trim()
        .split_once(' ')
        .ok_or(BasicAuthError::Malformed)?;

    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(BasicAuthError::UnsupportedScheme);
    }

    let decoded = Base64::decode_vec(encoded.trim()).map_err(|_| BasicAuthError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| BasicAuthError::Malformed)?;

    let (identifier, secret) = decoded.split_once(':').ok_or(BasicAuthError::Malformed)?;

    Ok(Credential::new(identifier, secret)?)
}

/// State for [`require_basic`]: the gate plus the pre-built challenge header.
pub struct BasicAuth<P> {
    gate: Arc<Gate<P>>,
    challenge: HeaderValue,
}

impl<P> BasicAuth<P> {
    /// # Errors
    /// Returns an error if the realm cannot be used in a header value.
    pub fn new(gate: Arc<Gate<P>>, realm: &str) -> Result<Self, InvalidHeaderValue> {
        let realm = realm.replace('\\', "\\\\").replace('"', "\\\"");
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{realm}\""))?;
        Ok(Self { gate, challenge })
    }

    fn challenge(&self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [(WWW_AUTHENTICATE, self.challenge.clone())],
        )
            .into_response()
    }
}

impl<P> Clone for BasicAuth<P> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            challenge: self.challenge.clone(),
        }
    }
}

/// axum middleware gating every request on Basic credentials.
pub async fn require_basic<P>(
    State(auth): State<BasicAuth<P>>,
    mut request: Request,
    next: Next,
) -> Response
where
    P: Clone + Send + Sync + 'static,
{
    let credential = match credential_from_headers(request.headers()) {
        Ok(credential) => credential,
        Err(err) => {
            debug!("Basic credentials not usable: {err}");
            return match err.status() {
                StatusCode::UNAUTHORIZED => auth.challenge(),
                status => status.into_response(),
            };
        }
    };

    match auth.gate.authenticate(credential).await {
        Outcome::Admitted(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Outcome::Rejected => auth.challenge(),
        Outcome::Failed(err) => {
            debug!("Authentication could not complete: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    fn basic(raw: &str) -> HeaderMap {
        headers(&format!("Basic {}", Base64::encode_string(raw.as_bytes())))
    }

    #[test]
    fn decodes_identifier_and_secret() -> Result<(), BasicAuthError> {
        let credential = credential_from_headers(&basic("alice:correct"))?;
        assert_eq!(credential.identifier(), "alice");
        assert_eq!(credential.secret().expose_secret(), "correct");
        Ok(())
    }

    #[test]
    fn secret_keeps_colons() -> Result<(), BasicAuthError> {
        let credential = credential_from_headers(&basic("alice:a:b:c"))?;
        assert_eq!(credential.identifier(), "alice");
        assert_eq!(credential.secret().expose_secret(), "a:b:c");
        Ok(())
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let encoded = Base64::encode_string(b"alice:correct");
        assert!(credential_from_headers(&headers(&format!("basic {encoded}"))).is_ok());
        assert!(credential_from_headers(&headers(&format!("BASIC {encoded}"))).is_ok());
    }

    #[test]
    fn missing_header_is_challenged() {
        let err = credential_from_headers(&HeaderMap::new()).err();
        assert_eq!(err, Some(BasicAuthError::Missing));
        assert_eq!(BasicAuthError::Missing.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn other_schemes_are_challenged() {
        let err = credential_from_headers(&headers("Bearer abc.def")).err();
        assert_eq!(err, Some(BasicAuthError::UnsupportedScheme));
        assert_eq!(
            BasicAuthError::UnsupportedScheme.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn malformed_values_are_bad_requests() {
        let values = vec![
            "Basic".to_string(),
            "Basic !!!not-base64!!!".to_string(),
            format!("Basic {}", Base64::encode_string(b"no-colon")),
            format!("Basic {}", Base64::encode_string(&[0xff, 0xfe, b':', b'x'])),
        ];
        for value in &values {
            let err = credential_from_headers(&headers(value)).err();
            assert_eq!(err, Some(BasicAuthError::Malformed), "header: {value}");
        }
        assert_eq!(BasicAuthError::Malformed.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn empty_parts_are_challenged() {
        for raw in [":secret", "alice:", ":"] {
            let err = credential_from_headers(&basic(raw)).err();
            assert!(
                matches!(err, Some(BasicAuthError::Incomplete(_))),
                "credentials: {raw}"
            );
        }
        assert_eq!(
            BasicAuthError::Incomplete(CredentialError::EmptySecret).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
