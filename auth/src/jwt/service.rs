use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::AccessClaims;
use super::claims::RefreshClaims;
use super::claims::TokenKind;
use super::errors::TokenError;

/// Time-to-live configuration for the two token kinds.
#[derive(Debug, Clone, Copy)]
pub struct TokenTtl {
    /// Access token lifetime
    pub access: Duration,

    /// Refresh token lifetime in whole days
    pub refresh_days: i64,
}

impl Default for TokenTtl {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh_days: 30,
        }
    }
}

/// A freshly issued refresh token together with the metadata the caller
/// needs to persist its record.
pub struct IssuedRefreshToken {
    /// Signed token string handed to the client
    pub token: String,

    /// Unique token identifier embedded in the claims
    pub jti: String,

    /// Absolute expiry of the token
    pub expires_at: DateTime<Utc>,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Signs and verifies the two token kinds with independent secrets.
///
/// Access and refresh tokens never share a key, so a leaked access secret
/// cannot be used to mint refresh tokens. Uses HS256 (HMAC with SHA-256).
pub struct TokenService {
    access_keys: SigningKeys,
    refresh_keys: SigningKeys,
    ttl: TokenTtl,
    algorithm: Algorithm,
}

impl TokenService {
    /// Create a new token service.
    ///
    /// # Arguments
    /// * `access_secret` - Signing secret for access tokens
    /// * `refresh_secret` - Signing secret for refresh tokens
    /// * `ttl` - Lifetimes for both token kinds
    ///
    /// # Security Notes
    /// - Secrets should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(access_secret: &[u8], refresh_secret: &[u8], ttl: TokenTtl) -> Self {
        Self {
            access_keys: SigningKeys::from_secret(access_secret),
            refresh_keys: SigningKeys::from_secret(refresh_secret),
            ttl,
            algorithm: Algorithm::HS256,
        }
    }

    /// Sign a new access token for a user.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_access_token(&self, user_id: &str, email: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            kind: TokenKind::Access,
            exp: (now + self.ttl.access).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.access_keys.encoding)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Sign a new refresh token for a user.
    ///
    /// Every call generates a fresh random `jti`, so two refresh tokens for
    /// the same user are never byte-identical.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<IssuedRefreshToken, TokenError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let expires_at = now + Duration::days(self.ttl.refresh_days);

        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: jti.clone(),
            kind: TokenKind::Refresh,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(self.algorithm),
            &claims,
            &self.refresh_keys.encoding,
        )
        .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        Ok(IssuedRefreshToken {
            token,
            jti,
            expires_at,
        })
    }

    /// Verify an access token and return its claims.
    ///
    /// Checks signature, expiry, the `type` discriminant, and that subject
    /// and email are present.
    ///
    /// # Errors
    /// * `InvalidToken` - Any verification failure, undifferentiated
    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = self.decode(token, &self.access_keys.decoding)?;

        if claims.kind != TokenKind::Access || claims.sub.is_empty() || claims.email.is_empty() {
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }

    /// Verify a refresh token and return its claims.
    ///
    /// Same checks as [`Self::verify_access_token`] but requires the
    /// `refresh` discriminant and a `jti`.
    ///
    /// # Errors
    /// * `InvalidToken` - Any verification failure, undifferentiated
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = self.decode(token, &self.refresh_keys.decoding)?;

        if claims.kind != TokenKind::Refresh || claims.sub.is_empty() || claims.jti.is_empty() {
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }

    fn decode<T: for<'de> serde::Deserialize<'de>>(
        &self,
        token: &str,
        key: &DecodingKey,
    ) -> Result<T, TokenError> {
        let validation = Validation::new(self.algorithm);

        // Expired, malformed, and bad-signature tokens are indistinguishable
        // to the caller.
        decode::<T>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_SECRET: &[u8] = b"access_secret_at_least_32_bytes_long!!";
    const REFRESH_SECRET: &[u8] = b"refresh_secret_at_least_32_bytes_long!";

    fn service() -> TokenService {
        TokenService::new(ACCESS_SECRET, REFRESH_SECRET, TokenTtl::default())
    }

    #[test]
    fn test_access_token_round_trip() {
        let tokens = service();

        let token = tokens
            .issue_access_token("user-1", "alice@example.com")
            .expect("Failed to issue access token");
        let claims = tokens
            .verify_access_token(&token)
            .expect("Failed to verify access token");

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let tokens = service();

        let issued = tokens
            .issue_refresh_token("user-1")
            .expect("Failed to issue refresh token");
        let claims = tokens
            .verify_refresh_token(&issued.token)
            .expect("Failed to verify refresh token");

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.jti, issued.jti);
        assert_eq!(claims.kind, TokenKind::Refresh);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
    }

    #[test]
    fn test_refresh_tokens_are_unique_per_issuance() {
        let tokens = service();

        let first = tokens.issue_refresh_token("user-1").unwrap();
        let second = tokens.issue_refresh_token("user-1").unwrap();

        assert_ne!(first.jti, second.jti);
        assert_ne!(first.token, second.token);
    }

    #[test]
    fn test_verify_with_wrong_secret_fails() {
        let tokens = service();
        let other = TokenService::new(
            b"other_access_secret_32_bytes_long!!!!!",
            b"other_refresh_secret_32_bytes_long!!!!",
            TokenTtl::default(),
        );

        let token = tokens
            .issue_access_token("user-1", "alice@example.com")
            .unwrap();

        assert!(matches!(
            other.verify_access_token(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let tokens = service();

        let access = tokens
            .issue_access_token("user-1", "alice@example.com")
            .unwrap();
        let refresh = tokens.issue_refresh_token("user-1").unwrap();

        assert!(tokens.verify_refresh_token(&access).is_err());
        assert!(tokens.verify_access_token(&refresh.token).is_err());
    }

    #[test]
    fn test_expired_access_token_rejected() {
        // Negative TTL beyond the default validation leeway
        let tokens = TokenService::new(
            ACCESS_SECRET,
            REFRESH_SECRET,
            TokenTtl {
                access: Duration::seconds(-300),
                refresh_days: 30,
            },
        );

        let token = tokens
            .issue_access_token("user-1", "alice@example.com")
            .unwrap();

        assert!(matches!(
            tokens.verify_access_token(&token),
            Err(TokenError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let tokens = service();
        assert!(tokens.verify_access_token("not.a.token").is_err());
        assert!(tokens.verify_refresh_token("").is_err());
    }
}
