//! Bearer token authentication.
//!
//! Callers present `Authorization: Bearer <token>`. The token is checked
//! against the configured secret; every failure mode collapses into `None`.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Opaque identity of an authenticated caller.
///
/// Only used to gate a request. It is dropped once the response is decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Verifies bearer credentials against a single shared secret.
#[derive(Clone)]
pub struct Authenticator {
    secret_digest: Option<[u8; 32]>,
}

impl Authenticator {
    /// Create an authenticator. `None` or a blank secret rejects every request.
    pub fn new(secret: Option<&str>) -> Self {
        let secret_digest = secret
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(digest);

        Self { secret_digest }
    }

    /// Authenticate a request from its headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<Principal> {
        let Some(expected) = self.secret_digest.as_ref() else {
            debug!("auth_secret_not_configured");
            return None;
        };

        let Some(token) = bearer_token(headers) else {
            debug!("auth_bearer_missing");
            return None;
        };

        let presented = digest(token);
        if !constant_time_compare(&presented, expected) {
            debug!("auth_bearer_mismatch");
            return None;
        }

        Some(Principal(hex::encode(&presented[..8])))
    }
}

/// Extract the token from an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_authenticate_valid_token() {
        let auth = Authenticator::new(Some("s3cret"));
        let principal = auth.authenticate(&headers_with("Bearer s3cret"));
        assert!(principal.is_some());
        assert_eq!(principal.unwrap().id().len(), 16);
    }

    #[test]
    fn test_authenticate_scheme_case_insensitive() {
        let auth = Authenticator::new(Some("s3cret"));
        assert!(auth.authenticate(&headers_with("bearer s3cret")).is_some());
        assert!(auth.authenticate(&headers_with("BEARER  s3cret ")).is_some());
    }

    #[test]
    fn test_authenticate_rejects_mismatch() {
        let auth = Authenticator::new(Some("s3cret"));
        assert!(auth.authenticate(&headers_with("Bearer wrong")).is_none());
        assert!(auth.authenticate(&headers_with("Bearer s3cret2")).is_none());
    }

    #[test]
    fn test_authenticate_rejects_malformed_header() {
        let auth = Authenticator::new(Some("s3cret"));
        assert!(auth.authenticate(&HeaderMap::new()).is_none());
        assert!(auth.authenticate(&headers_with("s3cret")).is_none());
        assert!(auth.authenticate(&headers_with("Basic s3cret")).is_none());
        assert!(auth.authenticate(&headers_with("Bearer ")).is_none());
    }

    #[test]
    fn test_authenticate_without_secret_rejects_everything() {
        assert!(Authenticator::new(None)
            .authenticate(&headers_with("Bearer anything"))
            .is_none());
        assert!(Authenticator::new(Some("   "))
            .authenticate(&headers_with("Bearer    "))
            .is_none());
    }

    #[test]
    fn test_principal_is_stable_per_token() {
        let auth = Authenticator::new(Some("s3cret"));
        let a = auth.authenticate(&headers_with("Bearer s3cret")).unwrap();
        let b = auth.authenticate(&headers_with("Bearer s3cret")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"abcd"));
    }
}
