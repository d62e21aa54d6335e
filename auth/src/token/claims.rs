use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Verified content of an access token.
///
/// Field names follow RFC 7519. `scope` is omitted from the encoded
/// token when empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    /// JWT ID, unique per minted token; the revocation key
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Optional granted scopes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope: Vec<String>,
}

impl Claims {
    /// Create claims for a subject issued at `issued_at`, expiring `ttl` later.
    ///
    /// A fresh random `jti` is generated for every call.
    pub fn for_subject(sub: impl ToString, issued_at: i64, ttl: Duration) -> Self {
        Self {
            sub: sub.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at,
            exp: issued_at + ttl.num_seconds(),
            scope: Vec::new(),
        }
    }

    /// Set scopes.
    pub fn with_scope<S: ToString>(mut self, scope: impl IntoIterator<Item = S>) -> Self {
        self.scope = scope.into_iter().map(|s| s.to_string()).collect();
        self
    }

    /// Whether `scope` was granted.
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }

    /// Check if token is expired. A token is still valid at exactly `exp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
