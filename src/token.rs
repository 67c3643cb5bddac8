//! Bearer token inspection
//!
//! Tokens are JWTs issued by the server. The client never verifies the
//! signature; it only reads the payload to decide whether a persisted session
//! is still worth restoring.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use revox_protocol::common::Claims;

use crate::error::{Result, RevoxError};

/// Read the claims of a JWT without checking its signature or expiry
pub fn decode_claims(token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| RevoxError::invalid_token(format!("Token could not be decoded: {}", e)))?;
    Ok(data.claims)
}

/// Expiry instant, if the token can be decoded
pub fn expiration_time(token: &str) -> Option<DateTime<Utc>> {
    let claims = decode_claims(token).ok()?;
    Utc.timestamp_opt(claims.exp, 0).single()
}

/// Subject (server user id) of the token
pub fn subject(token: &str) -> Option<String> {
    decode_claims(token).ok().map(|claims| claims.sub)
}

/// Whether the token is expired at `now`; undecodable tokens count as expired
pub fn is_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.exp < now.timestamp(),
        Err(e) => {
            tracing::debug!("Treating undecodable token as expired: {}", e);
            true
        }
    }
}

pub fn is_token_expired(token: &str) -> bool {
    is_expired_at(token, Utc::now())
}

#[cfg(test)]
pub(crate) fn encode_test_token(sub: &str, exp: i64) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: sub.to_string(),
        exp,
        iat: 0,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test-secret"))
        .expect("test token encodes")
}
