use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::ActorId;
use crate::domain::auth::models::ActorKind;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::Identity;
use crate::domain::auth::ports::IdentityDirectory;

/// Read-only PostgreSQL view over the identity records.
///
/// The `identities` table is owned and written by the user service; this
/// adapter only ever selects from it.
pub struct PostgresIdentityDirectory {
    pool: PgPool,
}

impl PostgresIdentityDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct IdentityRow {
    id: Uuid,
    email: String,
    password_hash: String,
    role: String,
    display_name: String,
    kind: String,
}

impl IdentityRow {
    fn into_identity(self) -> Result<Identity, AuthError> {
        Ok(Identity {
            id: ActorId(self.id),
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            role: self.role,
            display_name: self.display_name,
            kind: ActorKind::new(self.kind),
        })
    }
}

#[async_trait]
impl IdentityDirectory for PostgresIdentityDirectory {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, email, password_hash, role, display_name, kind
            FROM identities
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(IdentityRow::into_identity).transpose()
    }
}
