use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::auth::errors::AuthError;
use crate::domain::rate_limit::errors::RateLimitError;
use crate::domain::rate_limit::models::RateLimitQuota;

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;

/// Per-route quotas. Every route picks its own; there is no global default.
pub const REGISTER_QUOTA: RateLimitQuota = RateLimitQuota::new(10, 60);
pub const LOGIN_QUOTA: RateLimitQuota = RateLimitQuota::new(10, 60);
pub const REFRESH_QUOTA: RateLimitQuota = RateLimitQuota::new(30, 60);
pub const LOGOUT_QUOTA: RateLimitQuota = RateLimitQuota::new(20, 60);
pub const ME_QUOTA: RateLimitQuota = RateLimitQuota::new(60, 60);

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Client-facing error: an HTTP status plus a stable machine-readable code.
///
/// Serialized as `{ "error": { "code": ..., "message": ... } }`. Anything
/// not recognized collapses into `INTERNAL_SERVER_ERROR` with a generic
/// message so internal detail never reaches the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn invalid_json() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_JSON",
            "Request body must be valid JSON.",
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Invalid or expired access token.",
        )
    }

    fn internal(detail: String) -> Self {
        tracing::error!(error = %detail, "Internal server error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_SERVER_ERROR",
            "An unexpected error occurred.",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiErrorBody {
                error: ApiErrorDetail {
                    code: self.code,
                    message: self.message,
                },
            }),
        )
            .into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::EmailAlreadyExists => ApiError::new(
                StatusCode::CONFLICT,
                "EMAIL_ALREADY_EXISTS",
                "Email is already registered.",
            ),
            AuthError::InvalidCredentials => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid email or password.",
            ),
            AuthError::InvalidToken => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid refresh token.",
            ),
            AuthError::TokenExpired => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Refresh token has expired.",
            ),
            AuthError::Forbidden => ApiError::new(
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Refresh token does not belong to the user.",
            ),
            AuthError::Unauthorized => ApiError::unauthorized(),
            AuthError::InvalidEmail(_) | AuthError::InvalidUserId(_) => {
                ApiError::validation(err.to_string())
            }
            AuthError::DatabaseError(detail) | AuthError::Unknown(detail) => {
                ApiError::internal(detail)
            }
        }
    }
}

impl From<RateLimitError> for ApiError {
    fn from(err: RateLimitError) -> Self {
        match err {
            RateLimitError::Exceeded => ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT_EXCEEDED",
                "Too many requests. Please try again later.",
            ),
            RateLimitError::DatabaseError(detail) => ApiError::internal(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ApiErrorDetail {
    code: &'static str,
    message: String,
}

/// Token pair as exposed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<&crate::domain::auth::models::TokenPair> for TokenPairData {
    fn from(pair: &crate::domain::auth::models::TokenPair) -> Self {
        Self {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
        }
    }
}

/// Register and login share this response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponseData {
    pub user_id: String,
    pub email: String,
    pub tokens: TokenPairData,
}

impl From<&crate::domain::auth::models::AuthSession> for SessionResponseData {
    fn from(session: &crate::domain::auth::models::AuthSession) -> Self {
        Self {
            user_id: session.user_id.to_string(),
            email: session.email.as_str().to_string(),
            tokens: TokenPairData::from(&session.tokens),
        }
    }
}
