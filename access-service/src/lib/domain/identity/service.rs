use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Duration;

use crate::identity::errors::AuthError;
use crate::identity::models::Credentials;
use crate::identity::models::Identifier;
use crate::identity::models::SanitizedIdentity;
use crate::identity::models::SubjectId;
use crate::identity::ports::AuthServicePort;
use crate::identity::ports::CredentialStore;
use crate::identity::ports::RevocationRegistry;

/// Domain service implementation for authentication.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Holds no per-session state: a caller is authenticated only for the
/// duration of a request carrying a valid, unrevoked token.
pub struct AuthService<CS, RR>
where
    CS: CredentialStore,
    RR: RevocationRegistry,
{
    credential_store: Arc<CS>,
    revocation_registry: Arc<RR>,
    password_hasher: PasswordHasher,
    token_codec: Arc<TokenCodec>,
    token_ttl: Duration,
    // Verified against when the identifier is unknown, so both failure
    // paths cost one Argon2 run with the configured work factor.
    decoy_hash: String,
}

impl<CS, RR> AuthService<CS, RR>
where
    CS: CredentialStore,
    RR: RevocationRegistry,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `credential_store` - Identity directory lookups
    /// * `revocation_registry` - Logged-out token ids
    /// * `password_hasher` - Hasher configured with the service's work factor
    /// * `token_codec` - Token signing and validation
    /// * `token_ttl` - Lifetime of minted tokens
    ///
    /// # Errors
    /// * `HashingFailed` - The decoy hash could not be computed
    pub fn new(
        credential_store: Arc<CS>,
        revocation_registry: Arc<RR>,
        password_hasher: PasswordHasher,
        token_codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = password_hasher.hash(&SubjectId::new().to_string())?;

        Ok(Self {
            credential_store,
            revocation_registry,
            password_hasher,
            token_codec,
            token_ttl,
            decoy_hash,
        })
    }
}

#[async_trait]
impl<CS, RR> AuthServicePort for AuthService<CS, RR>
where
    CS: CredentialStore,
    RR: RevocationRegistry,
{
    async fn login(&self, credentials: Credentials) -> Result<String, AuthError> {
        let Credentials {
            identifier,
            password,
        } = credentials;

        let identifier = Identifier::new(&identifier).map_err(|e| {
            tracing::info!(error = %e, "Login failed: invalid identifier");
            AuthError::AuthenticationFailed
        })?;

        let identity = self
            .credential_store
            .find_by_identifier(&identifier)
            .await?;

        // Argon2 is deliberately slow; keep it off the async workers.
        let hasher = self.password_hasher.clone();
        let stored_hash = identity
            .as_ref()
            .map_or_else(|| self.decoy_hash.clone(), |i| i.password_hash.clone());
        let is_valid =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash)).await??;

        let identity = match identity {
            Some(identity) if is_valid => identity,
            Some(_) => {
                tracing::info!(identifier = %identifier, "Login failed: wrong password");
                return Err(AuthError::AuthenticationFailed);
            }
            None => {
                tracing::info!(identifier = %identifier, "Login failed: unknown identifier");
                return Err(AuthError::AuthenticationFailed);
            }
        };

        let token = self
            .token_codec
            .mint(&identity.id.to_string(), self.token_ttl)?;

        tracing::info!(subject = %identity.id, "Login succeeded");

        Ok(token)
    }

    async fn logout(&self, token: &str) {
        let claims = match self.token_codec.parse_ignoring_expiry(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Logout ignored: token rejected");
                return;
            }
        };

        match self
            .revocation_registry
            .revoke(&claims.jti, claims.exp)
            .await
        {
            Ok(()) => tracing::info!(subject = %claims.sub, token_id = %claims.jti, "Token revoked"),
            Err(e) => tracing::error!(
                subject = %claims.sub,
                token_id = %claims.jti,
                error = %e,
                "Failed to revoke token"
            ),
        }
    }

    async fn current_identity(&self, token: &str) -> Result<SanitizedIdentity, AuthError> {
        let claims = self.token_codec.parse(token).map_err(|e| {
            tracing::warn!(error = %e, "Token validation failed");
            AuthError::from(e)
        })?;

        if self.revocation_registry.is_revoked(&claims.jti).await? {
            tracing::warn!(subject = %claims.sub, token_id = %claims.jti, "Revoked token presented");
            return Err(AuthError::Revoked);
        }

        let subject = SubjectId::from_string(&claims.sub).map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not a valid id");
            AuthError::Malformed
        })?;

        let identity = self
            .credential_store
            .find_by_subject_id(&subject)
            .await?
            .ok_or_else(|| {
                tracing::warn!(subject = %subject, "Token subject no longer exists");
                AuthError::AuthenticationFailed
            })?;

        Ok(identity.sanitize())
    }
}
