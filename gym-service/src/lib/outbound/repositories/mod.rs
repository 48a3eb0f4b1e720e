pub mod rate_limit;
pub mod session;
pub mod user;

pub use rate_limit::PostgresRateLimitStore;
pub use session::PostgresSessionStore;
pub use user::PostgresUserRepository;
