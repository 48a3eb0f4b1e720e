use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::rate_limit::ports::RateLimitStore;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type carrying the resolved caller identity through the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Middleware guarding protected routes.
///
/// Extracts the bearer token, verifies it as an access token, checks the
/// revocation blocklist, and resolves the account. Every failure maps to
/// the same 401 response; callers learn nothing about which step failed.
pub async fn authenticate<AS, RS>(
    State(state): State<AppState<AS, RS>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    let token = bearer_token(req.headers())?;

    let identity = state
        .auth_service
        .authenticate_access_token(token)
        .await
        .map_err(|e| {
            tracing::warn!("Access token rejected: {}", e);
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: identity.user_id,
        email: identity.email,
    });

    Ok(next.run(req).await)
}

/// Extract the bearer token from the authorization header.
///
/// # Errors
/// Uniform 401 for a missing header, a non-Bearer scheme, or an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(ApiError::unauthorized)?;

    let auth_str = auth_header.to_str().map_err(|_| ApiError::unauthorized())?;

    let (scheme, token) = auth_str.split_once(' ').ok_or_else(ApiError::unauthorized)?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ApiError::unauthorized());
    }

    Ok(token)
}

/// Resolve the network identity of an unauthenticated caller.
///
/// First address of the forwarded-for chain, else the real-ip header, else
/// a literal "unknown".
pub fn client_identifier(headers: &HeaderMap) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = forwarded_for.split(',').next() {
            let first_ip = first_ip.trim();
            if !first_ip.is_empty() {
                return first_ip.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    "unknown".to_string()
}
