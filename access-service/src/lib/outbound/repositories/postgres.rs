use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde_json::Map;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::identity::errors::CredentialStoreError;
use crate::identity::models::Identifier;
use crate::identity::models::Identity;
use crate::identity::models::SubjectId;
use crate::identity::ports::CredentialStore;

/// Read-only view over the directory's `identities` table.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: Uuid,
    identifier: String,
    password_hash: String,
    profile: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = CredentialStoreError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let identifier = Identifier::new(&row.identifier).map_err(|e| {
            CredentialStoreError::CorruptRecord(format!("identity {}: {}", row.id, e))
        })?;

        Ok(Identity {
            id: SubjectId(row.id),
            identifier,
            password_hash: row.password_hash,
            profile: row.profile.0,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Identity>, CredentialStoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, identifier, password_hash, profile, created_at
            FROM identities
            WHERE identifier = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }

    async fn find_by_subject_id(
        &self,
        id: &SubjectId,
    ) -> Result<Option<Identity>, CredentialStoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, identifier, password_hash, profile, created_at
            FROM identities
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CredentialStoreError::Unavailable(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }
}
