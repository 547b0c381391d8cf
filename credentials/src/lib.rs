//! Credential primitives library
//!
//! Provides the building blocks the session service orchestrates:
//! - Password hashing and verification (Argon2id)
//! - Signed token issuance and decoding (access/refresh pairs)
//!
//! The service defines its own ports and error taxonomy and adapts these
//! implementations. Keeping the primitives here avoids coupling the service's
//! domain to a specific hashing or signing backend.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use credentials::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Token Issuance
//! ```
//! use chrono::Duration;
//! use credentials::{IdentityPayload, TokenIssuer};
//!
//! let issuer = TokenIssuer::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(15),
//!     Duration::days(7),
//! );
//! let payload = IdentityPayload {
//!     id: "user123".to_string(),
//!     email: "alice@example.com".to_string(),
//!     role: "member".to_string(),
//!     name: "Alice".to_string(),
//! };
//! let pair = issuer.issue(&payload).unwrap();
//! let claims = issuer.decode_access(&pair.access_token).unwrap();
//! assert_eq!(claims.identity.id, "user123");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::AccessClaims;
pub use token::IdentityPayload;
pub use token::RefreshClaims;
pub use token::TokenError;
pub use token::TokenIssuer;
pub use token::TokenPair;
