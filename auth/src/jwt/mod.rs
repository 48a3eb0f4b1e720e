pub mod claims;
pub mod errors;
pub mod service;

pub use claims::AccessClaims;
pub use claims::RefreshClaims;
pub use claims::TokenKind;
pub use errors::TokenError;
pub use service::IssuedRefreshToken;
pub use service::TokenService;
pub use service::TokenTtl;
