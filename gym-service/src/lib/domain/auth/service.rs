use std::sync::Arc;

use async_trait::async_trait;
use auth::fingerprint;
use auth::PasswordHasher;
use auth::TokenService;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AuthSession;
use crate::domain::auth::models::AuthenticatedIdentity;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::RevokedTokenKind;
use crate::domain::auth::models::RevokedTokenRecord;
use crate::domain::auth::models::TokenPair;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::SessionStore;
use crate::domain::auth::ports::UserRepository;

/// Authentication protocol orchestrator.
///
/// Composes the credential hasher, token service, and stores into the
/// register / login / refresh / logout operations. Every refresh token moves
/// through a strict lifecycle: live while its record exists, then consumed
/// exactly once by rotation, revocation, or expiry. Reuse of a consumed
/// token always fails because the record lookup is the source of truth.
pub struct AuthService<UR, SS>
where
    UR: UserRepository,
    SS: SessionStore,
{
    users: Arc<UR>,
    sessions: Arc<SS>,
    password_hasher: PasswordHasher,
    tokens: TokenService,
}

impl<UR, SS> AuthService<UR, SS>
where
    UR: UserRepository,
    SS: SessionStore,
{
    /// Create a new auth service with injected dependencies.
    pub fn new(
        users: Arc<UR>,
        sessions: Arc<SS>,
        password_hasher: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            sessions,
            password_hasher,
            tokens,
        }
    }

    /// Issue an access + refresh pair and persist the refresh record.
    async fn issue_token_pair(&self, user: &User) -> Result<TokenPair, AuthError> {
        let access_token = self
            .tokens
            .issue_access_token(&user.id.to_string(), user.email.as_str())
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?;

        let refresh = self
            .tokens
            .issue_refresh_token(&user.id.to_string())
            .map_err(|e| AuthError::Unknown(format!("Token generation failed: {}", e)))?;

        self.sessions
            .create_refresh_record(RefreshTokenRecord {
                id: Uuid::new_v4(),
                token_hash: fingerprint(&refresh.token),
                user_id: user.id,
                expires_at: refresh.expires_at,
            })
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh.token,
        })
    }
}

#[async_trait]
impl<UR, SS> AuthServicePort for AuthService<UR, SS>
where
    UR: UserRepository,
    SS: SessionStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<AuthSession, AuthError> {
        if self
            .users
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = self
            .password_hasher
            .hash(&command.password)
            .map_err(|e| AuthError::Unknown(format!("Password hashing failed: {}", e)))?;

        let user = self
            .users
            .create(User {
                id: UserId::new(),
                email: command.email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        let tokens = self.issue_token_pair(&user).await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(AuthSession {
            user_id: user.id,
            email: user.email,
            tokens,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, AuthError> {
        // Unknown email and wrong password produce the same error.
        let user = self
            .users
            .find_by_email(command.email.as_str())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let is_valid = self
            .password_hasher
            .verify(&command.password, &user.password_hash)
            .map_err(|e| AuthError::Unknown(format!("Password verification failed: {}", e)))?;

        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.issue_token_pair(&user).await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthSession {
            user_id: user.id,
            email: user.email,
            tokens,
        })
    }

    async fn refresh(&self, raw_refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .tokens
            .verify_refresh_token(raw_refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        let token_hash = fingerprint(raw_refresh_token);

        if self.sessions.find_revocation(&token_hash).await?.is_some() {
            return Err(AuthError::InvalidToken);
        }

        let record = self
            .sessions
            .find_refresh_record_by_hash(&token_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if record.user_id.to_string() != claims.sub {
            return Err(AuthError::InvalidToken);
        }

        if record.expires_at <= Utc::now() {
            self.sessions.delete_refresh_record(&record.id).await?;
            return Err(AuthError::TokenExpired);
        }

        let user = self
            .users
            .find_by_id(&record.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        // Rotation point: once the record is gone the old token can never
        // succeed again, even if resubmitted before its expiry. The delete
        // doubles as the consumption claim, so of two racing refreshes only
        // the one that removed the record gets tokens.
        if !self.sessions.delete_refresh_record(&record.id).await? {
            return Err(AuthError::InvalidToken);
        }

        let tokens = self.issue_token_pair(&user).await?;

        tracing::debug!(user_id = %user.id, "Refresh token rotated");

        Ok(tokens)
    }

    async fn logout(
        &self,
        raw_refresh_token: &str,
        raw_access_token: &str,
        caller: &UserId,
    ) -> Result<(), AuthError> {
        let claims = self
            .tokens
            .verify_refresh_token(raw_refresh_token)
            .map_err(|_| AuthError::InvalidToken)?;

        if claims.sub != caller.to_string() {
            return Err(AuthError::Forbidden);
        }

        let refresh_hash = fingerprint(raw_refresh_token);

        let record = self
            .sessions
            .find_refresh_record_by_hash(&refresh_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if record.user_id != *caller {
            return Err(AuthError::InvalidToken);
        }

        self.sessions
            .revoke_session(
                &record.id,
                RevokedTokenRecord {
                    token_hash: refresh_hash,
                    kind: RevokedTokenKind::Refresh,
                    user_id: *caller,
                    expires_at: Some(record.expires_at),
                },
                RevokedTokenRecord {
                    token_hash: fingerprint(raw_access_token),
                    kind: RevokedTokenKind::Access,
                    user_id: *caller,
                    expires_at: None,
                },
            )
            .await?;

        tracing::info!(user_id = %caller, "User logged out");

        Ok(())
    }

    async fn authenticate_access_token(
        &self,
        raw_access_token: &str,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        let claims = self
            .tokens
            .verify_access_token(raw_access_token)
            .map_err(|_| AuthError::Unauthorized)?;

        if self
            .sessions
            .find_revocation(&fingerprint(raw_access_token))
            .await?
            .is_some()
        {
            return Err(AuthError::Unauthorized);
        }

        let user_id = UserId::from_string(&claims.sub).map_err(|_| AuthError::Unauthorized)?;

        // Handles accounts deleted after token issuance.
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(AuthenticatedIdentity {
            user_id: user.id,
            email: user.email.as_str().to_string(),
        })
    }
}
