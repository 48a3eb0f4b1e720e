use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use super::LOGIN_QUOTA;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::LoginCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::rate_limit::ports::RateLimitStore;
use crate::inbound::http::middleware::client_identifier;
use crate::inbound::http::router::AppState;

pub async fn login<AS, RS>(
    State(state): State<AppState<AS, RS>>,
    headers: HeaderMap,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    state
        .rate_limiter
        .enforce(&client_identifier(&headers), "auth/login", LOGIN_QUOTA)
        .await?;

    let Json(body) = body.map_err(|_| ApiError::invalid_json())?;

    let session = state.auth_service.login(body.try_into_command()?).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SessionResponseData::from(&session),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

impl LoginRequestBody {
    fn try_into_command(self) -> Result<LoginCommand, ApiError> {
        let email = EmailAddress::new(self.email)
            .map_err(|_| ApiError::validation("Invalid login request payload."))?;

        if self.password.is_empty() || self.password.len() > 128 {
            return Err(ApiError::validation("Invalid login request payload."));
        }

        Ok(LoginCommand {
            email,
            password: self.password,
        })
    }
}
