use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::errors::CredentialStoreError;
use crate::identity::models::Identifier;
use crate::identity::models::Identity;
use crate::identity::models::SubjectId;
use crate::identity::ports::CredentialStore;

/// Identity directory held in process memory.
///
/// Backs development setups and tests. Lookups take a shared lock, so the
/// directory can be updated while logins are in flight.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    identities: RwLock<HashMap<SubjectId, Identity>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identity.
    ///
    /// # Errors
    /// * `IdentifierAlreadyExists` - Another identity uses the same identifier
    pub async fn insert(&self, identity: Identity) -> Result<(), CredentialStoreError> {
        let mut identities = self.identities.write().await;

        if identities.values().any(|existing| {
            existing.identifier == identity.identifier && existing.id != identity.id
        }) {
            return Err(CredentialStoreError::IdentifierAlreadyExists(
                identity.identifier.to_string(),
            ));
        }

        identities.insert(identity.id, identity);
        Ok(())
    }

    /// Remove an identity, returning it if it existed.
    pub async fn remove(&self, id: &SubjectId) -> Option<Identity> {
        self.identities.write().await.remove(id)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Identity>, CredentialStoreError> {
        Ok(self
            .identities
            .read()
            .await
            .values()
            .find(|identity| &identity.identifier == identifier)
            .cloned())
    }

    async fn find_by_subject_id(
        &self,
        id: &SubjectId,
    ) -> Result<Option<Identity>, CredentialStoreError> {
        Ok(self.identities.read().await.get(id).cloned())
    }
}
