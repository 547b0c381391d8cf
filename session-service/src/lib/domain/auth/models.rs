use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use credentials::IdentityPayload;
use uuid::Uuid;

use crate::domain::auth::errors::ActorIdError;
use crate::domain::auth::errors::EmailError;

/// Identity entity, owned by the user-management service.
///
/// This service only ever reads identities; creation and updates happen in
/// the collaborator that owns the record.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: ActorId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: String,
    pub display_name: String,
    pub kind: ActorKind,
}

/// Identity unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub Uuid);

impl ActorId {
    /// Generate a new random actor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an actor ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, ActorIdError> {
        Uuid::parse_str(s)
            .map(ActorId)
            .map_err(|e| ActorIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity-kind discriminator ("user" for regular accounts; other actor
/// kinds share the same session machinery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorKind(String);

impl ActorKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    /// Kind for regular user accounts.
    pub fn user() -> Self {
        Self("user".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Session record to be inserted on successful login.
///
/// Invariant: both token strings are always populated; the access token is a
/// well-formed signed token with a numeric expiry claim.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub actor: ActorId,
    pub actor_kind: ActorKind,
}

/// Session store identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Session record as persisted, with the store-assigned identifier.
///
/// A session is immutable once created; the only mutation the store sees is
/// deletion when the validator finds the access token expired.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub id: SessionId,
    pub access_token: String,
    pub refresh_token: String,
    pub actor: ActorId,
    pub actor_kind: ActorKind,
    pub created_at: DateTime<Utc>,
}

/// Command to authenticate with email and password.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

impl From<&Identity> for IdentityPayload {
    /// Allow-list projection: exactly the four fields that may enter a
    /// signed token. The password hash never crosses this boundary.
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            email: identity.email.as_str().to_string(),
            role: identity.role.clone(),
            name: identity.display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_address_validation() {
        assert!(EmailAddress::new("alice@example.com".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
    }

    #[test]
    fn test_actor_id_round_trip() {
        let id = ActorId::new();
        let parsed = ActorId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);

        assert!(ActorId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_identity_payload_allow_list() {
        let identity = Identity {
            id: ActorId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$secret_hash".to_string(),
            role: "member".to_string(),
            display_name: "Alice".to_string(),
            kind: ActorKind::user(),
        };

        let payload = IdentityPayload::from(&identity);

        assert_eq!(payload.id, identity.id.to_string());
        assert_eq!(payload.email, "alice@example.com");
        assert_eq!(payload.role, "member");
        assert_eq!(payload.name, "Alice");

        // Nothing resembling the hash survives the projection
        let serialized = serde_json::to_string(&payload).unwrap();
        assert!(!serialized.contains("argon2"));
        assert!(!serialized.contains("password"));
    }
}
