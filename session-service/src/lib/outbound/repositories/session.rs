use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::ActorId;
use crate::domain::auth::models::ActorKind;
use crate::domain::auth::models::Session;
use crate::domain::auth::models::SessionId;
use crate::domain::auth::models::StoredSession;
use crate::domain::auth::ports::SessionStore;

/// PostgreSQL implementation of the session store.
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    access_token: String,
    refresh_token: String,
    actor: Uuid,
    actor_kind: String,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for StoredSession {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId(row.id),
            access_token: row.access_token,
            refresh_token: row.refresh_token,
            actor: ActorId(row.actor),
            actor_kind: ActorKind::new(row.actor_kind),
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create(&self, session: Session) -> Result<StoredSession, AuthError> {
        let id = SessionId::new();
        let created_at = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sessions (id, access_token, refresh_token, actor, actor_kind, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id.0)
        .bind(&session.access_token)
        .bind(&session.refresh_token)
        .bind(session.actor.0)
        .bind(session.actor_kind.as_str())
        .bind(created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(StoredSession {
            id,
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            actor: session.actor,
            actor_kind: session.actor_kind,
            created_at,
        })
    }

    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<StoredSession>, AuthError> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, access_token, refresh_token, actor, actor_kind, created_at
            FROM sessions
            WHERE access_token = $1
            "#,
        )
        .bind(access_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(row.map(StoredSession::from))
    }

    async fn delete_by_access_token(&self, access_token: &str) -> Result<(), AuthError> {
        // Structured selector on the token column; deleting an absent row is
        // a no-op, which keeps concurrent expiry races safe.
        sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE access_token = $1
            "#,
        )
        .bind(access_token)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
