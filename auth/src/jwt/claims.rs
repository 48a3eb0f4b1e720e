use serde::Deserialize;
use serde::Serialize;

/// Discriminant separating the two token shapes.
///
/// Carried inside the signed payload as `"type"`; verification checks it
/// before trusting any other claim, so an access token can never pass where
/// a refresh token is expected or vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by a short-lived access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Email of the subject at issuance time
    pub email: String,

    /// Token shape discriminant, always [`TokenKind::Access`]
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// Claims carried by a long-lived refresh token.
///
/// The `jti` makes every issued refresh token unique even when the same user
/// obtains several within one second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Unique token identifier
    pub jti: String,

    /// Token shape discriminant, always [`TokenKind::Refresh`]
    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TokenKind::Access).unwrap(),
            "\"access\""
        );
        assert_eq!(
            serde_json::to_string(&TokenKind::Refresh).unwrap(),
            "\"refresh\""
        );
    }

    #[test]
    fn test_access_claims_wire_shape() {
        let claims = AccessClaims {
            sub: "user-1".to_string(),
            email: "alice@example.com".to_string(),
            kind: TokenKind::Access,
            exp: 2000,
            iat: 1000,
        };

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["type"], "access");
        assert_eq!(value["sub"], "user-1");
        assert_eq!(value["email"], "alice@example.com");
    }

    #[test]
    fn test_refresh_claims_require_jti() {
        let missing_jti = serde_json::json!({
            "sub": "user-1",
            "type": "refresh",
            "exp": 2000,
            "iat": 1000,
        });
        assert!(serde_json::from_value::<RefreshClaims>(missing_jti).is_err());
    }
}
