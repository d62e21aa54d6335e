use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Clock;
use auth::SystemClock;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::identity::errors::RevocationError;
use crate::identity::ports::RevocationRegistry;

#[derive(Debug, Clone, Copy)]
struct RevocationEntry {
    expires_at: i64,
    revoked_at: i64,
}

/// Revoked token ids held in process memory.
///
/// Entries only need to outlive the token they revoke; once `expires_at`
/// has passed the token fails validation anyway and the entry can go.
pub struct InMemoryRevocationRegistry {
    entries: RwLock<HashMap<String, RevocationEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRevocationRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Stamp revocations with `clock`, the same source that judges expiry.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// When `token_id` was first revoked, if it is still held.
    pub async fn revoked_at(&self, token_id: &str) -> Option<i64> {
        self.entries
            .read()
            .await
            .get(token_id)
            .map(|entry| entry.revoked_at)
    }

    /// Number of entries currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryRevocationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RevocationRegistry for InMemoryRevocationRegistry {
    async fn revoke(&self, token_id: &str, expires_at: i64) -> Result<(), RevocationError> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        // Keep the first revocation time if the token is revoked again.
        entries
            .entry(token_id.to_string())
            .and_modify(|entry| entry.expires_at = entry.expires_at.max(expires_at))
            .or_insert(RevocationEntry {
                expires_at,
                revoked_at: now,
            });

        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError> {
        Ok(self.entries.read().await.contains_key(token_id))
    }

    async fn purge_expired(&self, now: i64) -> Result<usize, RevocationError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();

        entries.retain(|token_id, entry| {
            let keep = entry.expires_at >= now;
            if !keep {
                tracing::debug!(
                    token_id = %token_id,
                    revoked_at = entry.revoked_at,
                    expires_at = entry.expires_at,
                    "Purging revocation entry"
                );
            }
            keep
        });

        Ok(before - entries.len())
    }
}

/// Periodically drop revocation entries for tokens that have expired.
pub fn spawn_purge_task<RR>(
    registry: Arc<RR>,
    clock: Arc<dyn Clock>,
    interval: Duration,
) -> JoinHandle<()>
where
    RR: RevocationRegistry,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match registry.purge_expired(clock.now()).await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Purged expired revocation entries"),
                Err(e) => tracing::error!(error = %e, "Failed to purge revocation entries"),
            }
        }
    })
}
