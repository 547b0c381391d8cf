use serde::Deserialize;
use serde::Serialize;

/// Identity fields embedded in a signed access token.
///
/// Exactly these four fields and nothing else goes into the token. Building
/// the payload from a fixed struct (rather than forwarding whatever the
/// caller holds) keeps the password hash and any future identity columns out
/// of the signed material.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentityPayload {
    pub id: String,
    pub email: String,
    pub role: String,
    pub name: String,
}

/// Claims carried by an access token: the identity payload plus timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    #[serde(flatten)]
    pub identity: IdentityPayload,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Claims carried by a refresh token.
///
/// Deliberately empty apart from the timestamps: the refresh token is an
/// opaque renewal handle and must not duplicate identity data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshClaims {
    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}
