use async_trait::async_trait;
use credentials::IdentityPayload;
use credentials::TokenPair;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Identity;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::StoredSession;

/// Port for the authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials, issue a token pair, and persist the session.
    ///
    /// # Arguments
    /// * `command` - Validated email plus submitted password
    ///
    /// # Returns
    /// The stored session record (token pair, actor, actor kind)
    ///
    /// # Errors
    /// * `UnknownEmail` - No identity matches the email
    /// * `PasswordMismatch` - Password does not match the stored hash
    /// * `Password` - Hashing primitive failed (internal, not a mismatch)
    /// * `Token` - Token signing failed
    /// * `DatabaseError` - Lookup or insert failed
    async fn login(&self, command: LoginCommand) -> Result<StoredSession, AuthError>;

    /// Validate a presented bearer token against the stored session.
    ///
    /// # Arguments
    /// * `presented` - Raw bearer string, with or without the `Bearer ` prefix
    /// * `payload` - Identity payload the caller decoded from the token
    ///
    /// # Returns
    /// A freshly issued token pair
    ///
    /// # Errors
    /// * `SessionNotFound` - No session matches the presented token
    /// * `SessionExpired` - The stored access token's expiry has passed
    /// * `Token` - Stored token is malformed or re-issuance failed
    /// * `DatabaseError` - Session lookup failed
    async fn validate_session(
        &self,
        presented: &str,
        payload: IdentityPayload,
    ) -> Result<TokenPair, AuthError>;
}

/// Read-only lookup into the identity records owned by the user service.
#[async_trait]
pub trait IdentityDirectory: Send + Sync + 'static {
    /// Retrieve an identity by email address.
    ///
    /// # Returns
    /// Optional identity (None if no record matches)
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;
}

/// Persistence operations for session records.
///
/// One session per successful login. There is no update operation: a session
/// is immutable from creation until the validator deletes it on expiry.
/// Refresh tokens are stored but never looked up.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a new session.
    ///
    /// # Returns
    /// The session with its store-assigned identifier
    ///
    /// # Errors
    /// * `DatabaseError` - Insert failed
    async fn create(&self, session: Session) -> Result<StoredSession, AuthError>;

    /// Retrieve a session by exact access-token match.
    ///
    /// # Returns
    /// Optional session (None if no record matches)
    ///
    /// # Errors
    /// * `DatabaseError` - Lookup failed
    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<StoredSession>, AuthError>;

    /// Delete the session keyed by the given access token.
    ///
    /// Idempotent: deleting an absent session is not an error.
    ///
    /// # Errors
    /// * `DatabaseError` - Delete failed
    async fn delete_by_access_token(&self, access_token: &str) -> Result<(), AuthError>;
}
