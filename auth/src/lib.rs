//! Authentication primitives library
//!
//! Provides the cryptographic building blocks for the gym-tracker service:
//! - Password hashing (bcrypt with a configurable cost factor)
//! - JWT issuance and verification for typed access/refresh claims
//! - One-way token fingerprints used as storage keys
//!
//! The service defines its own store ports and protocol orchestration and
//! composes these primitives; nothing in this crate touches persistence.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new(PasswordHasher::DEFAULT_COST).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Token issuance and verification
//! ```
//! use auth::{TokenService, TokenTtl};
//!
//! let tokens = TokenService::new(
//!     b"access_secret_at_least_32_bytes_long!!",
//!     b"refresh_secret_at_least_32_bytes_long!",
//!     TokenTtl::default(),
//! );
//!
//! let access = tokens.issue_access_token("user-1", "alice@example.com").unwrap();
//! let claims = tokens.verify_access_token(&access).unwrap();
//! assert_eq!(claims.email, "alice@example.com");
//! ```
//!
//! ## Token fingerprints
//! ```
//! use auth::fingerprint;
//!
//! // Deterministic, so it can serve as a lookup key for stored tokens.
//! assert_eq!(fingerprint("token"), fingerprint("token"));
//! ```

pub mod fingerprint;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use fingerprint::fingerprint;
pub use jwt::AccessClaims;
pub use jwt::IssuedRefreshToken;
pub use jwt::RefreshClaims;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use jwt::TokenService;
pub use jwt::TokenTtl;
pub use password::PasswordError;
pub use password::PasswordHasher;
