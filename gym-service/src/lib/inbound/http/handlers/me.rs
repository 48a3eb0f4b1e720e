use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::ME_QUOTA;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::rate_limit::ports::RateLimitStore;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn me<AS, RS>(
    State(state): State<AppState<AS, RS>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<MeResponseData>, ApiError>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    state
        .rate_limiter
        .enforce(
            &format!("{}:{}", user.user_id, "users/me"),
            "users/me",
            ME_QUOTA,
        )
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        MeResponseData {
            user: MeUserData {
                id: user.user_id.to_string(),
                email: user.email,
            },
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeResponseData {
    pub user: MeUserData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeUserData {
    pub id: String,
    pub email: String,
}
