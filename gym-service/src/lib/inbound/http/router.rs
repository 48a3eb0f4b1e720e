use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::rate_limit::ports::RateLimitStore;
use crate::domain::rate_limit::service::RateLimiter;

pub struct AppState<AS, RS>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    pub auth_service: Arc<AS>,
    pub rate_limiter: Arc<RateLimiter<RS>>,
}

// Manual Clone: deriving would bound AS and RS themselves on Clone.
impl<AS, RS> Clone for AppState<AS, RS>
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            rate_limiter: Arc::clone(&self.rate_limiter),
        }
    }
}

pub fn create_router<AS, RS>(
    auth_service: Arc<AS>,
    rate_limiter: Arc<RateLimiter<RS>>,
) -> Router
where
    AS: AuthServicePort,
    RS: RateLimitStore,
{
    let state = AppState {
        auth_service,
        rate_limiter,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register::<AS, RS>))
        .route("/api/auth/login", post(login::<AS, RS>))
        .route("/api/auth/refresh", post(refresh::<AS, RS>));

    let protected_routes = Router::new()
        .route("/api/auth/logout", post(logout::<AS, RS>))
        .route("/api/users/me", get(me::<AS, RS>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<AS, RS>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
