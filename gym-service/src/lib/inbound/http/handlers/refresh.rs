use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenPairData;
use super::REFRESH_QUOTA;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::rate_limit::ports::RateLimitStore;
use crate::inbound::http::middleware::client_identifier;
use crate::inbound::http::router::AppState;

pub async fn refresh<AS, RS>(
    State(state): State<AppState<AS, RS>>,
    headers: HeaderMap,
    body: Result<Json<RefreshRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    state
        .rate_limiter
        .enforce(&client_identifier(&headers), "auth/refresh", REFRESH_QUOTA)
        .await?;

    let Json(body) = body.map_err(|_| ApiError::invalid_json())?;

    if body.refresh_token.is_empty() {
        return Err(ApiError::validation("Invalid token refresh payload."));
    }

    let tokens = state.auth_service.refresh(&body.refresh_token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        RefreshResponseData {
            tokens: TokenPairData::from(&tokens),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequestBody {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub tokens: TokenPairData,
}
