use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::UserIdError;

/// User aggregate entity.
///
/// Immutable after registration apart from the password hash; there is no
/// reset flow, so in practice nothing changes.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address value type.
///
/// Trims and lowercases on construction so uniqueness is case-insensitive
/// everywhere the address is stored or compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid email address
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One currently valid refresh token, stored by fingerprint.
///
/// At most one live record exists per raw token; the record is deleted the
/// moment its token is rotated, revoked, or found expired.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: Uuid,
    pub token_hash: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

/// Discriminator for revocation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokedTokenKind {
    Access,
    Refresh,
}

impl RevokedTokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevokedTokenKind::Access => "ACCESS",
            RevokedTokenKind::Refresh => "REFRESH",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACCESS" => Some(RevokedTokenKind::Access),
            "REFRESH" => Some(RevokedTokenKind::Refresh),
            _ => None,
        }
    }
}

/// Blocklist entry marking one token permanently unusable.
///
/// Access entries carry no expiry; refresh entries keep the original token
/// expiry so the blocklist can be pruned later.
#[derive(Debug, Clone)]
pub struct RevokedTokenRecord {
    pub token_hash: String,
    pub kind: RevokedTokenKind,
    pub user_id: UserId,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Access + refresh token pair handed to clients.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Result of register and login: the user's identity plus a fresh pair.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: EmailAddress,
    pub tokens: TokenPair,
}

/// Identity resolved from a verified, unrevoked access token.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub email: String,
}

/// Command to register a new user with validated fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: EmailAddress,
    pub password: String,
}

/// Command to log an existing user in.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}
