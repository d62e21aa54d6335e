//! Authentication primitives library
//!
//! Provides the building blocks of the access service:
//! - Password hashing (Argon2id, configurable work factor)
//! - Signed access tokens (HS256 JWT) with explicit expiry and token ids
//! - A pluggable clock so token lifetimes can be tested without sleeping
//!
//! Services define their own ports and orchestration on top of these.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::TokenCodec;
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let token = codec.mint("user123", Duration::hours(1)).unwrap();
//! let claims = codec.parse(&token).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::Clock;
pub use token::ManualClock;
pub use token::SystemClock;
pub use token::TokenCodec;
pub use token::TokenError;
