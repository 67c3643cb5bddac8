//! Authentication-related common types

use serde::{Deserialize, Serialize};

/// Claims carried in the bearer token payload
///
/// The client never verifies the signature; it only reads the expiry to
/// decide whether a persisted session is still usable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID as string)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}
