use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::identity::errors::IdentifierError;
use crate::identity::errors::SubjectIdError;

/// Identity aggregate entity.
///
/// Represents a registered account as held by the identity directory.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: SubjectId,
    pub identifier: Identifier,
    pub password_hash: String,
    pub profile: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Strip the password hash, producing the shape that may leave the service.
    pub fn sanitize(self) -> SanitizedIdentity {
        let mut profile = self.profile;
        for reserved in SanitizedIdentity::RESERVED_KEYS {
            profile.remove(*reserved);
        }

        SanitizedIdentity {
            id: self.id,
            identifier: self.identifier,
            created_at: self.created_at,
            profile,
        }
    }
}

/// Identity without any credential material.
///
/// Profile keys are flattened next to the fixed fields when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SanitizedIdentity {
    pub id: SubjectId,
    pub identifier: Identifier,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl SanitizedIdentity {
    /// Profile keys that would shadow fixed fields or look like credentials.
    const RESERVED_KEYS: &'static [&'static str] = &[
        "id",
        "identifier",
        "created_at",
        "password",
        "password_hash",
    ];
}

/// Subject identifier carried in tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubjectId(pub Uuid);

impl SubjectId {
    /// Generate a new random subject ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a subject ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, SubjectIdError> {
        Uuid::parse_str(s)
            .map(SubjectId)
            .map_err(|e| SubjectIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login identifier value type (a mobile number, username, ...)
///
/// Surrounding whitespace is trimmed; the result must be 1-64 characters
/// with no inner whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid identifier.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 64 characters
    /// * `InvalidCharacters` - Contains whitespace or control characters
    pub fn new(identifier: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let trimmed = identifier.as_ref().trim();

        let length = trimmed.chars().count();
        if length == 0 {
            return Err(IdentifierError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(IdentifierError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(IdentifierError::InvalidCharacters);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Login input: identifier and plaintext password.
///
/// Never stored; `login` takes it by value and drops it once verified.
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}
