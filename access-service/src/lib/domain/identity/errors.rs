use auth::PasswordError;
use auth::TokenError;
use thiserror::Error;

/// Error for SubjectId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubjectIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier is empty")]
    Empty,

    #[error("Identifier too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Identifier contains whitespace or control characters")]
    InvalidCharacters,
}

/// Error raised by the identity directory
#[derive(Debug, Clone, Error)]
pub enum CredentialStoreError {
    #[error("Identifier already exists: {0}")]
    IdentifierAlreadyExists(String),

    #[error("Corrupt identity record: {0}")]
    CorruptRecord(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}

/// Error raised by the revocation registry
#[derive(Debug, Clone, Error)]
pub enum RevocationError {
    #[error("Revocation registry unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error for authentication operations.
///
/// Unknown identifiers, wrong passwords and deleted subjects all surface as
/// `AuthenticationFailed` so callers cannot probe which accounts exist.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token has been revoked")]
    Revoked,

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl AuthError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::AuthenticationFailed => "authentication_failed",
            AuthError::Malformed => "malformed",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "expired",
            AuthError::Revoked => "revoked",
            AuthError::Infrastructure(_) => "infrastructure",
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Malformed(_) => AuthError::Malformed,
            TokenError::InvalidSignature => AuthError::InvalidSignature,
            TokenError::Expired => AuthError::Expired,
            TokenError::EncodingFailed(_) | TokenError::WeakSecret { .. } => {
                AuthError::Infrastructure(err.to_string())
            }
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}

impl From<CredentialStoreError> for AuthError {
    fn from(err: CredentialStoreError) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}

impl From<RevocationError> for AuthError {
    fn from(err: RevocationError) -> Self {
        AuthError::Infrastructure(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Infrastructure(format!("Hashing worker failed: {}", err))
    }
}
