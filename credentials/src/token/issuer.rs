use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::AccessClaims;
use super::claims::IdentityPayload;
use super::claims::RefreshClaims;
use super::errors::TokenError;

/// A freshly issued access/refresh token pair.
///
/// Every successful login and every successful session validation produces a
/// new pair; issuance is never idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and decodes session tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signing secret and both TTLs are
/// injected at construction and are read-only afterwards; nothing here reads
/// ambient process state at call time.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

/// Minimal view of a token used when only the expiry claim matters.
#[derive(Debug, Deserialize)]
struct ExpiryOnly {
    exp: i64,
}

impl TokenIssuer {
    /// Create a new issuer.
    ///
    /// # Arguments
    /// * `secret` - HS256 signing secret (at least 32 bytes recommended)
    /// * `access_ttl` - Lifetime of issued access tokens
    /// * `refresh_ttl` - Lifetime of issued refresh tokens
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a fresh access/refresh pair for the given identity payload.
    ///
    /// The access token carries the payload plus `iat`/`exp`; the refresh
    /// token carries `iat`/`exp` only.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, payload: &IdentityPayload) -> Result<TokenPair, TokenError> {
        let now = Utc::now();
        let header = Header::new(self.algorithm);

        let access_claims = AccessClaims {
            identity: payload.clone(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };
        let access_token = encode(&header, &access_claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        let refresh_claims = RefreshClaims {
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };
        let refresh_token = encode(&header, &refresh_claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Decode and verify an access token, returning its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - The `exp` claim has elapsed
    /// * `DecodingFailed` - Bad signature or malformed token
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let validation = Validation::new(self.algorithm);

        let token_data =
            decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    _ => TokenError::DecodingFailed(e.to_string()),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Read the `exp` claim of a token without verifying its signature.
    ///
    /// The session validator uses this on tokens it already holds in the
    /// store; the signature was checked when the token entered the store, so
    /// only the expiry is of interest here. Never use this on tokens from an
    /// untrusted source.
    ///
    /// # Errors
    /// * `DecodingFailed` - Malformed token or missing `exp` claim
    pub fn expiry_unix(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.insecure_disable_signature_validation();
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        let token_data = decode::<ExpiryOnly>(token, &self.decoding_key, &validation)
            .map_err(|e| TokenError::DecodingFailed(e.to_string()))?;

        Ok(token_data.claims.exp)
    }
}
