use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RefreshTokenRecord;
use crate::domain::auth::models::RevokedTokenKind;
use crate::domain::auth::models::RevokedTokenRecord;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::SessionStore;

pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct RefreshTokenRow {
    id: Uuid,
    token_hash: String,
    user_id: Uuid,
    expires_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshTokenRecord {
    fn from(row: RefreshTokenRow) -> Self {
        RefreshTokenRecord {
            id: row.id,
            token_hash: row.token_hash,
            user_id: UserId(row.user_id),
            expires_at: row.expires_at,
        }
    }
}

#[derive(FromRow)]
struct RevokedTokenRow {
    token_hash: String,
    token_type: String,
    user_id: Uuid,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<RevokedTokenRow> for RevokedTokenRecord {
    type Error = AuthError;

    fn try_from(row: RevokedTokenRow) -> Result<Self, Self::Error> {
        let kind = RevokedTokenKind::from_str(&row.token_type).ok_or_else(|| {
            AuthError::DatabaseError(format!("Unknown revoked token type: {}", row.token_type))
        })?;

        Ok(RevokedTokenRecord {
            token_hash: row.token_hash,
            kind,
            user_id: UserId(row.user_id),
            expires_at: row.expires_at,
        })
    }
}

const UPSERT_REVOCATION: &str = r#"
    INSERT INTO revoked_tokens (token_hash, token_type, user_id, expires_at)
    VALUES ($1, $2, $3, $4)
    ON CONFLICT (token_hash) DO UPDATE
    SET token_type = EXCLUDED.token_type,
        user_id = EXCLUDED.user_id,
        expires_at = EXCLUDED.expires_at
"#;

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn create_refresh_record(&self, record: RefreshTokenRecord) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (id, token_hash, user_id, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.id)
        .bind(&record.token_hash)
        .bind(record.user_id.0)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_refresh_record_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let row: Option<RefreshTokenRow> = sqlx::query_as(
            r#"
            SELECT id, token_hash, user_id, expires_at
            FROM refresh_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(row.map(RefreshTokenRecord::from))
    }

    async fn delete_refresh_record(&self, id: &Uuid) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_revocation(
        &self,
        token_hash: &str,
    ) -> Result<Option<RevokedTokenRecord>, AuthError> {
        let row: Option<RevokedTokenRow> = sqlx::query_as(
            r#"
            SELECT token_hash, token_type, user_id, expires_at
            FROM revoked_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(RevokedTokenRecord::try_from).transpose()
    }

    async fn revoke_session(
        &self,
        refresh_record_id: &Uuid,
        refresh_revocation: RevokedTokenRecord,
        access_revocation: RevokedTokenRecord,
    ) -> Result<(), AuthError> {
        // One transaction: a crash can never leave the refresh record gone
        // while either token is still absent from the blocklist.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM refresh_tokens WHERE id = $1")
            .bind(refresh_record_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        for revocation in [refresh_revocation, access_revocation] {
            sqlx::query(UPSERT_REVOCATION)
                .bind(&revocation.token_hash)
                .bind(revocation.kind.as_str())
                .bind(revocation.user_id.0)
                .bind(revocation.expires_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| AuthError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
