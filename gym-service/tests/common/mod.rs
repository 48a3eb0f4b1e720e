use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenService;
use auth::TokenTtl;
use chrono::DateTime;
use chrono::Utc;
use gym_service::domain::auth::errors::AuthError;
use gym_service::domain::auth::models::RefreshTokenRecord;
use gym_service::domain::auth::models::RevokedTokenRecord;
use gym_service::domain::auth::models::User;
use gym_service::domain::auth::models::UserId;
use gym_service::domain::auth::ports::SessionStore;
use gym_service::domain::auth::ports::UserRepository;
use gym_service::domain::auth::service::AuthService;
use gym_service::domain::rate_limit::errors::RateLimitError;
use gym_service::domain::rate_limit::ports::RateLimitStore;
use gym_service::domain::rate_limit::service::RateLimiter;
use gym_service::inbound::http::router::create_router;
use uuid::Uuid;

pub const TEST_ACCESS_SECRET: &[u8] = b"test_access_secret_32_bytes_long!!!!!!";
pub const TEST_REFRESH_SECRET: &[u8] = b"test_refresh_secret_32_bytes_long!!!!!";

/// In-memory user repository mirroring the Postgres adapter's contract,
/// including the unique-email backstop.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists);
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.values().find(|u| u.email.as_str() == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.get(&id.0).cloned())
    }
}

#[derive(Default)]
struct SessionState {
    refresh_records: HashMap<String, RefreshTokenRecord>,
    revocations: HashMap<String, RevokedTokenRecord>,
}

/// In-memory session store. The single mutex makes `revoke_session` atomic
/// the same way the Postgres transaction does.
#[derive(Default)]
pub struct InMemorySessionStore {
    state: Mutex<SessionState>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_refresh_record(&self, record: RefreshTokenRecord) -> Result<(), AuthError> {
        let mut state = self.state.lock().unwrap();
        if state.refresh_records.contains_key(&record.token_hash) {
            return Err(AuthError::DatabaseError(
                "duplicate refresh token hash".to_string(),
            ));
        }
        state.refresh_records.insert(record.token_hash.clone(), record);
        Ok(())
    }

    async fn find_refresh_record_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let state = self.state.lock().unwrap();
        Ok(state.refresh_records.get(token_hash).cloned())
    }

    async fn delete_refresh_record(&self, id: &Uuid) -> Result<bool, AuthError> {
        let mut state = self.state.lock().unwrap();
        let before = state.refresh_records.len();
        state.refresh_records.retain(|_, record| record.id != *id);
        Ok(state.refresh_records.len() < before)
    }

    async fn find_revocation(
        &self,
        token_hash: &str,
    ) -> Result<Option<RevokedTokenRecord>, AuthError> {
        let state = self.state.lock().unwrap();
        Ok(state.revocations.get(token_hash).cloned())
    }

    async fn revoke_session(
        &self,
        refresh_record_id: &Uuid,
        refresh_revocation: RevokedTokenRecord,
        access_revocation: RevokedTokenRecord,
    ) -> Result<(), AuthError> {
        let mut state = self.state.lock().unwrap();
        state
            .refresh_records
            .retain(|_, record| record.id != *refresh_record_id);
        state
            .revocations
            .insert(refresh_revocation.token_hash.clone(), refresh_revocation);
        state
            .revocations
            .insert(access_revocation.token_hash.clone(), access_revocation);
        Ok(())
    }
}

/// In-memory append-only event log backing the sliding window.
#[derive(Default)]
pub struct InMemoryRateLimitStore {
    events: Mutex<Vec<(String, String, DateTime<Utc>)>>,
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn count_since(
        &self,
        identifier: &str,
        endpoint: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, RateLimitError> {
        let events = self.events.lock().unwrap();
        Ok(events
            .iter()
            .filter(|(i, e, at)| i == identifier && e == endpoint && *at >= since)
            .count() as i64)
    }

    async fn record(&self, identifier: &str, endpoint: &str) -> Result<(), RateLimitError> {
        let mut events = self.events.lock().unwrap();
        events.push((identifier.to_string(), endpoint.to_string(), Utc::now()));
        Ok(())
    }
}

/// Test application that spawns the real router on a random port, backed by
/// in-memory stores so no database is needed.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let auth_service = Arc::new(AuthService::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(InMemorySessionStore::default()),
            PasswordHasher::new(PasswordHasher::MIN_COST).expect("Invalid test hash cost"),
            TokenService::new(TEST_ACCESS_SECRET, TEST_REFRESH_SECRET, TokenTtl::default()),
        ));
        let rate_limiter = Arc::new(RateLimiter::new(Arc::new(
            InMemoryRateLimitStore::default(),
        )));

        let router = create_router(auth_service, rate_limiter);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }
}
