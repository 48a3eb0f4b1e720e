use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionResponseData;
use super::REGISTER_QUOTA;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::rate_limit::ports::RateLimitStore;
use crate::inbound::http::middleware::client_identifier;
use crate::inbound::http::router::AppState;

pub async fn register<AS, RS>(
    State(state): State<AppState<AS, RS>>,
    headers: HeaderMap,
    body: Result<Json<RegisterRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    state
        .rate_limiter
        .enforce(&client_identifier(&headers), "auth/register", REGISTER_QUOTA)
        .await?;

    let Json(body) = body.map_err(|_| ApiError::invalid_json())?;

    let session = state
        .auth_service
        .register(body.try_into_command()?)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        SessionResponseData::from(&session),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    email: String,
    password: String,
}

impl RegisterRequestBody {
    fn try_into_command(self) -> Result<RegisterCommand, ApiError> {
        let email = EmailAddress::new(self.email)
            .map_err(|_| ApiError::validation("Invalid register request payload."))?;

        if self.password.len() < 8 || self.password.len() > 128 {
            return Err(ApiError::validation("Invalid register request payload."));
        }

        Ok(RegisterCommand {
            email,
            password: self.password,
        })
    }
}
