use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::LOGOUT_QUOTA;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::rate_limit::ports::RateLimitStore;
use crate::inbound::http::middleware::bearer_token;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn logout<AS, RS>(
    State(state): State<AppState<AS, RS>>,
    Extension(user): Extension<AuthenticatedUser>,
    headers: HeaderMap,
    body: Result<Json<LogoutRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    state
        .rate_limiter
        .enforce(
            &format!("{}:{}", user.user_id, "auth/logout"),
            "auth/logout",
            LOGOUT_QUOTA,
        )
        .await?;

    let Json(body) = body.map_err(|_| ApiError::invalid_json())?;

    if body.refresh_token.is_empty() {
        return Err(ApiError::validation("Invalid logout payload."));
    }

    // The middleware already verified this token; it is re-read here only to
    // pass the raw string through for blocklisting.
    let access_token = bearer_token(&headers)?;

    state
        .auth_service
        .logout(&body.refresh_token, access_token, &user.user_id)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData { success: true },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub success: bool,
}
