//! HMAC-SHA256 signed tokens carrying JSON claims.
//!
//! Format: `<prefix><claims_hex>.<hmac_hex>`, where the HMAC is computed over
//! the raw claims bytes. Session tokens and magic-link tokens share the
//! mechanism but use distinct prefixes so one can never be presented as the
//! other.

use hmac::{Hmac, Mac};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Prefix for session tokens.
pub const SESSION_PREFIX: &str = "pw_st_";
/// Prefix for magic-link sign-in tokens.
pub const MAGIC_LINK_PREFIX: &str = "pw_ml_";

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    #[error("token signature verification failed")]
    SignatureMismatch,

    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    #[error("token expired")]
    Expired,
}

/// Sign a claims value into a token with the given prefix.
pub fn sign<T: Serialize>(secret: &[u8], prefix: &str, claims: &T) -> String {
    let payload = serde_json::to_vec(claims).expect("claims serialize to JSON");
    let mac = compute_hmac(secret, &payload);
    format!("{prefix}{}.{}", hex::encode(&payload), hex::encode(mac))
}

/// Verify a token's prefix and signature and decode its claims.
///
/// The HMAC check uses a constant-time comparison. Expiry is the caller's
/// concern; claims carry their own `exp` field.
pub fn verify<T: DeserializeOwned>(secret: &[u8], prefix: &str, token: &str) -> Result<T, TokenError> {
    let rest = token
        .strip_prefix(prefix)
        .ok_or_else(|| TokenError::InvalidFormat(format!("token must start with {prefix:?}")))?;

    let (payload_hex, mac_hex) = rest
        .split_once('.')
        .ok_or_else(|| TokenError::InvalidFormat("missing signature separator".to_string()))?;

    let payload = hex::decode(payload_hex)
        .map_err(|e| TokenError::InvalidFormat(format!("invalid hex in payload: {e}")))?;
    let provided_mac = hex::decode(mac_hex)
        .map_err(|e| TokenError::InvalidFormat(format!("invalid hex in signature: {e}")))?;

    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(&payload);
    mac.verify_slice(&provided_mac)
        .map_err(|_| TokenError::SignatureMismatch)?;

    serde_json::from_slice(&payload).map_err(|e| TokenError::InvalidClaims(e.to_string()))
}

fn compute_hmac(secret: &[u8], message: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Claims {
        sub: String,
        exp: i64,
    }

    const SECRET: &[u8] = b"unit-test-secret";

    #[test]
    fn sign_and_verify_round_trip() {
        let claims = Claims { sub: "u1".into(), exp: 4102444800 };
        let token = sign(SECRET, SESSION_PREFIX, &claims);
        assert!(token.starts_with(SESSION_PREFIX));

        let decoded: Claims = verify(SECRET, SESSION_PREFIX, &token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let claims = Claims { sub: "u1".into(), exp: 4102444800 };
        let token = sign(SECRET, SESSION_PREFIX, &claims);

        // Flip one hex digit in the payload.
        let mut chars: Vec<char> = token.chars().collect();
        let i = SESSION_PREFIX.len();
        chars[i] = if chars[i] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();

        let result: Result<Claims, _> = verify(SECRET, SESSION_PREFIX, &tampered);
        assert!(matches!(
            result,
            Err(TokenError::SignatureMismatch) | Err(TokenError::InvalidFormat(_))
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = Claims { sub: "u1".into(), exp: 4102444800 };
        let token = sign(SECRET, SESSION_PREFIX, &claims);
        let result: Result<Claims, _> = verify(b"other-secret", SESSION_PREFIX, &token);
        assert!(matches!(result, Err(TokenError::SignatureMismatch)));
    }

    #[test]
    fn prefixes_are_not_interchangeable() {
        let claims = Claims { sub: "u1".into(), exp: 4102444800 };
        let token = sign(SECRET, MAGIC_LINK_PREFIX, &claims);
        let result: Result<Claims, _> = verify(SECRET, SESSION_PREFIX, &token);
        assert!(matches!(result, Err(TokenError::InvalidFormat(_))));
    }
}
