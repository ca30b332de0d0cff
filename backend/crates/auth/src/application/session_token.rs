//! Session Token Codec
//!
//! The client-held credential is `"<session_id>.<signature>"` where the
//! signature is HMAC-SHA256 over the UUID string, base64url-encoded without
//! padding. The session itself lives server-side; the token only proves the
//! ID was issued by us.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Sign a session ID into a cookie-ready token
pub fn sign(session_id: Uuid, secret: &[u8; 32]) -> String {
    let session_id = session_id.to_string();

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!("{}.{}", session_id, URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a token and recover the session ID
///
/// Any malformed or tampered token maps to `Unauthenticated`; the caller
/// cannot distinguish a forged token from an absent session.
pub fn verify(token: &str, secret: &[u8; 32]) -> AuthResult<Uuid> {
    let (session_id_str, signature_b64) = token
        .split_once('.')
        .ok_or(AuthError::Unauthenticated)?;

    let mut mac =
        HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(session_id_str.as_bytes());

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| AuthError::Unauthenticated)?;

    mac.verify_slice(&signature)
        .map_err(|_| AuthError::Unauthenticated)?;

    session_id_str.parse().map_err(|_| AuthError::Unauthenticated)
}
