//! Signed session cookies.
//!
//! The cookie value is `<session id>.<hex HMAC-SHA256(session id)>`. A
//! missing, malformed or tampered cookie yields a fresh session and a
//! `Set-Cookie` header for it. With a max age configured, every response
//! re-issues the cookie so its expiry slides with the server-side idle TTL.

use crate::error::GatewayError;
use axum::http::{HeaderMap, HeaderValue, header};
use dsatutor_core::session::SessionId;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::Duration;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

pub const COOKIE_NAME: &str = "dsatutor_session";

/// Signs and verifies session identifiers with a server secret.
#[derive(Clone)]
pub struct SessionSigner {
    mac: HmacSha256,
    max_age: Option<Duration>,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Result<Self, GatewayError> {
        if secret.is_empty() {
            return Err(GatewayError::InvalidSecret("must not be empty".into()));
        }
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| GatewayError::InvalidSecret(e.to_string()))?;
        Ok(Self { mac, max_age: None })
    }

    /// Give issued cookies a `Max-Age`.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    fn tag(&self, id: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac
    }

    /// Cookie value for `id`.
    pub fn sign(&self, id: &SessionId) -> String {
        let digest = self.tag(id.as_str()).finalize().into_bytes();
        format!("{}.{}", id.as_str(), hex::encode(digest))
    }

    /// The session id carried by `value`, if its signature checks out.
    pub fn verify(&self, value: &str) -> Option<SessionId> {
        let (id, sig_hex) = value.rsplit_once('.')?;
        if id.is_empty() {
            return None;
        }
        let provided = hex::decode(sig_hex).ok()?;
        self.tag(id)
            .verify_slice(&provided)
            .ok()
            .map(|_| SessionId::from(id))
    }

    /// Full `Set-Cookie` header value for `id`.
    pub fn set_cookie(&self, id: &SessionId) -> Option<HeaderValue> {
        let mut cookie = format!(
            "{COOKIE_NAME}={}; HttpOnly; SameSite=Lax; Path=/",
            self.sign(id)
        );
        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age.as_secs()));
        }
        HeaderValue::from_str(&cookie).ok()
    }
}

/// The caller's session and, for a new session, the cookie to set.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub id: SessionId,
    pub set_cookie: Option<HeaderValue>,
}

/// Read the session from request headers, minting a new one when absent or invalid.
pub fn resolve(signer: &SessionSigner, headers: &HeaderMap) -> ResolvedSession {
    if let Some(id) = cookie_value(headers, COOKIE_NAME).and_then(|v| signer.verify(v)) {
        let set_cookie = signer.max_age.and_then(|_| signer.set_cookie(&id));
        return ResolvedSession { id, set_cookie };
    }

    let id = SessionId::new();
    debug!(session = %id, "Issuing new session cookie");
    ResolvedSession {
        set_cookie: signer.set_cookie(&id),
        id,
    }
}

/// Find a cookie by name across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new("test-secret").unwrap()
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn sign_then_verify() {
        let signer = signer();
        let id = SessionId::new();
        let value = signer.sign(&id);
        assert!(value.starts_with(id.as_str()));
        assert_eq!(signer.verify(&value), Some(id));
    }

    #[test]
    fn tampered_value_is_rejected() {
        let signer = signer();
        let value = signer.sign(&SessionId::from("abc"));
        let forged = value.replacen("abc", "abd", 1);
        assert!(signer.verify(&forged).is_none());
        assert!(signer.verify("abc").is_none());
        assert!(signer.verify("abc.not-hex").is_none());
        assert!(signer.verify(".00").is_none());
    }

    #[test]
    fn other_secret_is_rejected() {
        let value = signer().sign(&SessionId::from("abc"));
        let other = SessionSigner::new("another-secret").unwrap();
        assert!(other.verify(&value).is_none());
    }

    #[test]
    fn empty_secret_is_invalid() {
        assert!(SessionSigner::new("").is_err());
    }

    #[test]
    fn resolve_known_cookie() {
        let signer = signer();
        let id = SessionId::from("known");
        let cookie = format!("theme=dark; {COOKIE_NAME}={}", signer.sign(&id));

        let resolved = resolve(&signer, &headers_with_cookie(&cookie));
        assert_eq!(resolved.id, id);
        assert!(resolved.set_cookie.is_none());
    }

    #[test]
    fn resolve_missing_or_bad_cookie_mints_session() {
        let signer = signer();

        let fresh = resolve(&signer, &HeaderMap::new());
        let set_cookie = fresh.set_cookie.unwrap();
        let set_cookie = set_cookie.to_str().unwrap();
        assert!(set_cookie.starts_with(&format!("{COOKIE_NAME}={}.", fresh.id)));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Path=/"));

        let bad = resolve(&signer, &headers_with_cookie(&format!("{COOKIE_NAME}=x.00")));
        assert!(bad.set_cookie.is_some());
        assert_ne!(bad.id.as_str(), "x");
    }

    #[test]
    fn max_age_is_sent_and_refreshed() {
        let signer = signer().with_max_age(Duration::from_secs(3600));

        let fresh = resolve(&signer, &HeaderMap::new());
        let issued = fresh.set_cookie.unwrap();
        let issued = issued.to_str().unwrap();
        assert!(issued.ends_with("; Max-Age=3600"));

        let pair = issued.split(';').next().unwrap();
        let again = resolve(&signer, &headers_with_cookie(pair));
        assert_eq!(again.id, fresh.id);
        let refreshed = again.set_cookie.unwrap();
        assert!(refreshed.to_str().unwrap().contains("Max-Age=3600"));
    }

    #[test]
    fn no_max_age_by_default() {
        let fresh = resolve(&signer(), &HeaderMap::new());
        assert!(!fresh.set_cookie.unwrap().to_str().unwrap().contains("Max-Age"));
    }
}
