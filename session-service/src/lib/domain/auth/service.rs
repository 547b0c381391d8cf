use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use credentials::IdentityPayload;
use credentials::PasswordHasher;
use credentials::TokenIssuer;
use credentials::TokenPair;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::StoredSession;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::IdentityDirectory;
use crate::domain::auth::ports::SessionStore;

/// Single fixed prefix, case-sensitive.
const BEARER_PREFIX: &str = "Bearer ";

/// Authentication service: credential verification, token issuance, and
/// session validation over injected identity and session ports.
pub struct AuthService<ID, SS>
where
    ID: IdentityDirectory,
    SS: SessionStore,
{
    identities: Arc<ID>,
    sessions: Arc<SS>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
}

impl<ID, SS> AuthService<ID, SS>
where
    ID: IdentityDirectory,
    SS: SessionStore,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `identities` - Read-only identity lookup implementation
    /// * `sessions` - Session persistence implementation
    /// * `token_issuer` - Configured signing primitive (secret and TTLs)
    pub fn new(identities: Arc<ID>, sessions: Arc<SS>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            identities,
            sessions,
            password_hasher: PasswordHasher::new(),
            token_issuer,
        }
    }
}

#[async_trait]
impl<ID, SS> AuthServicePort for AuthService<ID, SS>
where
    ID: IdentityDirectory,
    SS: SessionStore,
{
    async fn login(&self, command: LoginCommand) -> Result<StoredSession, AuthError> {
        let identity = self
            .identities
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| AuthError::UnknownEmail(command.email.to_string()))?;

        // A primitive failure propagates as-is; only a clean comparison
        // returning false is a mismatch.
        let matches = self
            .password_hasher
            .verify(&command.password, &identity.password_hash)?;
        if !matches {
            return Err(AuthError::PasswordMismatch);
        }

        let payload = IdentityPayload::from(&identity);
        let pair = self.token_issuer.issue(&payload)?;

        let session = Session {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            actor: identity.id,
            actor_kind: identity.kind,
        };
        let stored = self.sessions.create(session).await?;

        tracing::debug!(
            session_id = %stored.id,
            actor = %stored.actor,
            actor_kind = %stored.actor_kind,
            "Session created"
        );

        Ok(stored)
    }

    /// Presented -> Resolved -> {Valid, Expired} -> {Authenticated, Rejected}.
    ///
    /// On the Valid path a fresh pair is issued from the caller-supplied
    /// payload, but the stored session is NOT rewritten with it: the record
    /// stays keyed by the login-time access token until that token expires.
    /// Known inconsistency, kept as observed; fixing it would be an explicit
    /// update-or-replace on the store.
    async fn validate_session(
        &self,
        presented: &str,
        payload: IdentityPayload,
    ) -> Result<TokenPair, AuthError> {
        let lookup_key = presented.strip_prefix(BEARER_PREFIX).unwrap_or(presented);

        let session = self
            .sessions
            .find_by_access_token(lookup_key)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        let expires_at_millis = self.token_issuer.expiry_unix(&session.access_token)? * 1000;
        if expires_at_millis <= Utc::now().timestamp_millis() {
            // Best effort: the rejection stands even if the cleanup fails.
            if let Err(e) = self
                .sessions
                .delete_by_access_token(&session.access_token)
                .await
            {
                tracing::warn!(
                    session_id = %session.id,
                    error = %e,
                    "Failed to delete expired session"
                );
            }
            return Err(AuthError::SessionExpired);
        }

        let pair = self.token_issuer.issue(&payload)?;
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::auth::models::ActorId;
    use crate::domain::auth::models::ActorKind;
    use crate::domain::auth::models::EmailAddress;
    use crate::domain::auth::models::Identity;
    use crate::domain::auth::models::SessionId;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestIdentityDirectory {}

        #[async_trait]
        impl IdentityDirectory for TestIdentityDirectory {
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError>;
        }
    }

    mock! {
        pub TestSessionStore {}

        #[async_trait]
        impl SessionStore for TestSessionStore {
            async fn create(&self, session: Session) -> Result<StoredSession, AuthError>;
            async fn find_by_access_token(&self, access_token: &str) -> Result<Option<StoredSession>, AuthError>;
            async fn delete_by_access_token(&self, access_token: &str) -> Result<(), AuthError>;
        }
    }

    fn issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(
            SECRET,
            Duration::minutes(15),
            Duration::days(7),
        ))
    }

    fn identity_with_password(password: &str) -> Identity {
        let hash = PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash password");
        Identity {
            id: ActorId::new(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: hash,
            role: "member".to_string(),
            display_name: "Alice".to_string(),
            kind: ActorKind::user(),
        }
    }

    fn stored_session_for(pair: &TokenPair, actor: ActorId) -> StoredSession {
        StoredSession {
            id: SessionId::new(),
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
            actor,
            actor_kind: ActorKind::user(),
            created_at: Utc::now(),
        }
    }

    fn payload() -> IdentityPayload {
        IdentityPayload {
            id: "00000000-0000-0000-0000-000000000001".to_string(),
            email: "alice@example.com".to_string(),
            role: "member".to_string(),
            name: "Alice".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        let identity = identity_with_password("secret");
        let actor = identity.id;
        let kind = identity.kind.clone();

        directory
            .expect_find_by_email()
            .withf(|email| email.as_str() == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));

        store
            .expect_create()
            .withf(|session| !session.access_token.is_empty() && !session.refresh_token.is_empty())
            .times(1)
            .returning(|session| {
                Ok(StoredSession {
                    id: SessionId::new(),
                    access_token: session.access_token,
                    refresh_token: session.refresh_token,
                    actor: session.actor,
                    actor_kind: session.actor_kind,
                    created_at: Utc::now(),
                })
            });

        let token_issuer = issuer();
        let service = AuthService::new(Arc::new(directory), Arc::new(store), token_issuer.clone());

        let command = LoginCommand::new(
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "secret".to_string(),
        );

        let before = Utc::now().timestamp();
        let stored = service.login(command).await.expect("Login failed");

        assert_eq!(stored.actor, actor);
        assert_eq!(stored.actor_kind, kind);

        // The stored access token decodes with expiry = now + access TTL
        let claims = token_issuer
            .decode_access(&stored.access_token)
            .expect("Failed to decode stored access token");
        assert_eq!(claims.identity.id, actor.to_string());
        assert_eq!(claims.identity.email, "alice@example.com");
        assert!(claims.exp >= before + 15 * 60);
        assert!(claims.exp <= Utc::now().timestamp() + 15 * 60);
    }

    #[tokio::test]
    async fn test_login_unknown_email_writes_nothing() {
        let mut directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        directory
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_create().times(0);

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let command = LoginCommand::new(
            EmailAddress::new("nobody@example.com".to_string()).unwrap(),
            "secret".to_string(),
        );

        let result = service.login(command).await;
        assert!(matches!(result, Err(AuthError::UnknownEmail(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_writes_nothing() {
        let mut directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        let identity = identity_with_password("secret");
        directory
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));
        store.expect_create().times(0);

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let command = LoginCommand::new(
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "wrong_password".to_string(),
        );

        let result = service.login(command).await;
        assert!(matches!(result, Err(AuthError::PasswordMismatch)));
    }

    #[tokio::test]
    async fn test_login_malformed_hash_is_internal_not_mismatch() {
        let mut directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        let mut identity = identity_with_password("secret");
        identity.password_hash = "corrupted".to_string();
        directory
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(identity.clone())));
        store.expect_create().times(0);

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let command = LoginCommand::new(
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            "secret".to_string(),
        );

        let result = service.login(command).await;
        assert!(matches!(result, Err(AuthError::Password(_))));
    }

    #[tokio::test]
    async fn test_validate_valid_session_issues_fresh_pair() {
        let token_issuer = issuer();
        let pair = token_issuer.issue(&payload()).unwrap();
        let session = stored_session_for(&pair, ActorId::new());
        let token = pair.access_token.clone();

        let directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        let expected = token.clone();
        store
            .expect_find_by_access_token()
            .withf(move |t| t == expected)
            .times(1)
            .returning(move |_| Ok(Some(session.clone())));
        store.expect_delete_by_access_token().times(0);

        let service = AuthService::new(Arc::new(directory), Arc::new(store), token_issuer.clone());

        let fresh = service
            .validate_session(&format!("Bearer {}", token), payload())
            .await
            .expect("Validation failed");

        assert!(!fresh.access_token.is_empty());
        assert!(!fresh.refresh_token.is_empty());

        let claims = token_issuer.decode_access(&fresh.access_token).unwrap();
        assert_eq!(claims.identity, payload());
    }

    #[tokio::test]
    async fn test_validate_twice_does_not_delete() {
        let token_issuer = issuer();
        let pair = token_issuer.issue(&payload()).unwrap();
        let session = stored_session_for(&pair, ActorId::new());
        let token = pair.access_token.clone();

        let directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        store
            .expect_find_by_access_token()
            .times(2)
            .returning(move |_| Ok(Some(session.clone())));
        store.expect_delete_by_access_token().times(0);

        let service = AuthService::new(Arc::new(directory), Arc::new(store), token_issuer);

        let bearer = format!("Bearer {}", token);
        let first = service.validate_session(&bearer, payload()).await;
        let second = service.validate_session(&bearer, payload()).await;

        assert!(first.is_ok());
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_validate_expired_session_deletes_and_rejects() {
        // Issue the stored token already expired
        let expired_issuer = TokenIssuer::new(SECRET, Duration::minutes(-5), Duration::days(7));
        let pair = expired_issuer.issue(&payload()).unwrap();
        let session = stored_session_for(&pair, ActorId::new());
        let token = pair.access_token.clone();

        let directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        store
            .expect_find_by_access_token()
            .times(1)
            .returning(move |_| Ok(Some(session.clone())));

        let expected = token.clone();
        store
            .expect_delete_by_access_token()
            .withf(move |t| t == expected)
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let result = service
            .validate_session(&format!("Bearer {}", token), payload())
            .await;
        assert!(matches!(result, Err(AuthError::SessionExpired)));
    }

    #[tokio::test]
    async fn test_validate_expired_rejects_even_if_delete_fails() {
        let expired_issuer = TokenIssuer::new(SECRET, Duration::minutes(-5), Duration::days(7));
        let pair = expired_issuer.issue(&payload()).unwrap();
        let session = stored_session_for(&pair, ActorId::new());

        let directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        store
            .expect_find_by_access_token()
            .times(1)
            .returning(move |_| Ok(Some(session.clone())));
        store
            .expect_delete_by_access_token()
            .times(1)
            .returning(|_| Err(AuthError::DatabaseError("store unreachable".to_string())));

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let result = service
            .validate_session(&format!("Bearer {}", pair.access_token), payload())
            .await;
        assert!(matches!(result, Err(AuthError::SessionExpired)));
    }

    #[tokio::test]
    async fn test_validate_unknown_token_rejects_without_mutation() {
        let directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        store
            .expect_find_by_access_token()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_delete_by_access_token().times(0);
        store.expect_create().times(0);

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let result = service
            .validate_session("Bearer unknown-token", payload())
            .await;
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_validate_strips_bearer_prefix_for_lookup() {
        let directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        store
            .expect_find_by_access_token()
            .withf(|t| t == "tok123")
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let result = service.validate_session("Bearer tok123", payload()).await;
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_validate_without_prefix_uses_raw_string() {
        let directory = MockTestIdentityDirectory::new();
        let mut store = MockTestSessionStore::new();

        store
            .expect_find_by_access_token()
            .withf(|t| t == "tok123")
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(directory), Arc::new(store), issuer());

        let result = service.validate_session("tok123", payload()).await;
        assert!(matches!(result, Err(AuthError::SessionNotFound)));
    }
}
