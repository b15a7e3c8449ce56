//! Signed-cookie user identification middleware.
//!
//! Every request gets an opaque UID. A valid signed cookie is accepted as-is;
//! anything else (missing cookie, bad signature) gets a freshly issued UID
//! and a `Set-Cookie` on the response. Handlers read the UID from request
//! extensions and treat it as an opaque string — identity beyond "same
//! cookie, same user" is out of scope.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Name of the identification cookie.
pub const UID_COOKIE: &str = "microlink_uid";

/// The requester's opaque identifier, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct Uid(pub String);

/// Issues and verifies HMAC-SHA256 signed UID cookie values.
///
/// Cookie value format: `{uid}.{base64(hmac(uid))}`. The UID itself is
/// URL-safe base64, so the last `.` always separates value from signature.
#[derive(Clone)]
pub struct UidSigner {
    key: Arc<[u8]>,
}

impl UidSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::from(secret.as_bytes()),
        }
    }

    /// Generates a fresh opaque UID.
    pub fn issue(&self) -> String {
        let mut buf = [0u8; 16];
        getrandom::fill(&mut buf).expect("Failed to generate random bytes");
        URL_SAFE_NO_PAD.encode(buf)
    }

    /// Builds the signed cookie value for a UID.
    pub fn cookie_value(&self, uid: &str) -> String {
        let mut mac = self.mac();
        mac.update(uid.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{uid}.{signature}")
    }

    /// Extracts the UID from a cookie value, if the signature holds.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (uid, signature) = value.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac();
        mac.update(uid.as_bytes());
        mac.verify_slice(&signature).ok()?;

        (!uid.is_empty()).then(|| uid.to_owned())
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.key).expect("HMAC accepts any key length")
    }
}

/// Resolves or issues the requester's UID.
pub async fn layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let verified = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| find_cookie(cookies, UID_COOKIE))
        .and_then(|value| state.uid_signer.verify(&value));

    match verified {
        Some(uid) => {
            req.extensions_mut().insert(Uid(uid));
            next.run(req).await
        }
        None => {
            let uid = state.uid_signer.issue();
            let cookie = state.uid_signer.cookie_value(&uid);
            req.extensions_mut().insert(Uid(uid));

            let mut response = next.run(req).await;
            if let Ok(value) =
                HeaderValue::from_str(&format!("{UID_COOKIE}={cookie}; Path=/; HttpOnly"))
            {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            response
        }
    }
}

fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_roundtrip() {
        let signer = UidSigner::new("test-secret");
        let uid = signer.issue();

        let value = signer.cookie_value(&uid);
        assert_eq!(signer.verify(&value), Some(uid));
    }

    #[test]
    fn test_tampered_uid_is_rejected() {
        let signer = UidSigner::new("test-secret");
        let value = signer.cookie_value("legit-uid");

        let tampered = value.replacen("legit", "evil1", 1);
        assert_eq!(signer.verify(&tampered), None);
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let signer = UidSigner::new("test-secret");
        let other = UidSigner::new("other-secret");

        let value = signer.cookie_value("some-uid");
        assert_eq!(other.verify(&value), None);
    }

    #[test]
    fn test_garbage_cookie_is_rejected() {
        let signer = UidSigner::new("test-secret");
        assert_eq!(signer.verify("no-signature-here"), None);
        assert_eq!(signer.verify(""), None);
        assert_eq!(signer.verify("a.b.c"), None);
    }

    #[test]
    fn test_find_cookie() {
        let cookies = "foo=bar; microlink_uid=abc.def; other=1";
        assert_eq!(
            find_cookie(cookies, "microlink_uid"),
            Some("abc.def".to_string())
        );
        assert_eq!(find_cookie(cookies, "missing"), None);
    }
}
