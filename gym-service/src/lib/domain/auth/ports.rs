use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthSession;
use crate::domain::auth::models::AuthenticatedIdentity;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::RevokedTokenRecord;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for the authentication protocol operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user and issue a fresh token pair.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError>;

    /// Verify credentials and issue a fresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, identical
    ///   error for both so neither case is revealed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError>;

    /// Rotate a refresh token: consume the presented token and issue a new
    /// pair. The consumed token can never succeed again.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature, revoked, unknown, or mismatched token
    /// * `TokenExpired` - Stored record past its expiry (record is deleted)
    /// * `DatabaseError` - Store operation failed
    async fn refresh(&self, raw_refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// End a session: delete the refresh record and blocklist both tokens.
    ///
    /// # Errors
    /// * `InvalidToken` - Malformed refresh token or no live record
    /// * `Forbidden` - Refresh token belongs to a different user
    /// * `DatabaseError` - Store operation failed
    async fn logout(
        &self,
        raw_refresh_token: &str,
        raw_access_token: &str,
        caller: &UserId,
    ) -> Result<(), AuthError>;

    /// Resolve the identity behind a bearer access token.
    ///
    /// Verifies the token, checks the revocation blocklist, and confirms the
    /// account still exists.
    ///
    /// # Errors
    /// * `Unauthorized` - Any failure, undifferentiated
    /// * `DatabaseError` - Store operation failed
    async fn authenticate_access_token(
        &self,
        raw_access_token: &str,
    ) -> Result<AuthenticatedIdentity, AuthError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Unique constraint on normalized email hit
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve a user by normalized email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Retrieve a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;
}

/// Persistence operations for refresh-token records and the revocation
/// blocklist.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a new live refresh-token record.
    ///
    /// The store enforces at most one record per token hash.
    async fn create_refresh_record(&self, record: RefreshTokenRecord) -> Result<(), AuthError>;

    /// Look up a live refresh record by token fingerprint.
    async fn find_refresh_record_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Delete a refresh record by id, returning whether a record was
    /// actually removed. Rotation consumes the record through this call, so
    /// when two callers race only one may observe `true`.
    async fn delete_refresh_record(&self, id: &Uuid) -> Result<bool, AuthError>;

    /// Look up a revocation entry by token fingerprint.
    async fn find_revocation(
        &self,
        token_hash: &str,
    ) -> Result<Option<RevokedTokenRecord>, AuthError>;

    /// Atomically end a session: delete the refresh record and upsert both
    /// revocation entries as one unit. Either all three writes land or none
    /// do, so a crash can never leave a token usable but half-revoked.
    async fn revoke_session(
        &self,
        refresh_record_id: &Uuid,
        refresh_revocation: RevokedTokenRecord,
        access_revocation: RevokedTokenRecord,
    ) -> Result<(), AuthError>;
}
