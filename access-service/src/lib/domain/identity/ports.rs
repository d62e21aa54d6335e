use async_trait::async_trait;

use crate::identity::errors::AuthError;
use crate::identity::errors::CredentialStoreError;
use crate::identity::errors::RevocationError;
use crate::identity::models::Credentials;
use crate::identity::models::Identifier;
use crate::identity::models::Identity;
use crate::identity::models::SanitizedIdentity;
use crate::identity::models::SubjectId;

/// Port for authentication operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Verify credentials and mint an access token.
    ///
    /// # Arguments
    /// * `credentials` - Identifier and plaintext password, consumed
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `AuthenticationFailed` - Unknown identifier or wrong password (indistinguishable)
    /// * `Infrastructure` - Store, hashing or signing unavailable
    async fn login(&self, credentials: Credentials) -> Result<String, AuthError>;

    /// Revoke a token until its natural expiry.
    ///
    /// Best effort and idempotent: invalid tokens and registry failures are
    /// logged, never reported.
    async fn logout(&self, token: &str);

    /// Resolve the identity a token was issued to.
    ///
    /// # Returns
    /// Identity without credential material
    ///
    /// # Errors
    /// * `Malformed` / `InvalidSignature` / `Expired` - Token rejected
    /// * `Revoked` - Token was logged out
    /// * `AuthenticationFailed` - Subject no longer exists
    /// * `Infrastructure` - Store or registry unavailable
    async fn current_identity(&self, token: &str) -> Result<SanitizedIdentity, AuthError>;
}

/// Read access to the identity directory.
///
/// The directory owns identity records; this service only looks them up.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve identity by login identifier.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Backing store failed
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<Identity>, CredentialStoreError>;

    /// Retrieve identity by subject id.
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Unavailable` - Backing store failed
    async fn find_by_subject_id(
        &self,
        id: &SubjectId,
    ) -> Result<Option<Identity>, CredentialStoreError>;
}

/// Tokens invalidated before their natural expiry.
#[async_trait]
pub trait RevocationRegistry: Send + Sync + 'static {
    /// Record a token id as revoked until `expires_at`. Idempotent.
    async fn revoke(&self, token_id: &str, expires_at: i64) -> Result<(), RevocationError>;

    /// Whether a token id has been revoked.
    async fn is_revoked(&self, token_id: &str) -> Result<bool, RevocationError>;

    /// Drop entries whose token expired before `now`.
    ///
    /// # Returns
    /// Number of entries removed
    async fn purge_expired(&self, now: i64) -> Result<usize, RevocationError>;
}
