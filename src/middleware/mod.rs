pub mod auth;
pub mod rate_limit;
pub mod error_handler;

pub use auth::{ApiKeyAuth, ApiKeyRecord, hash_api_key, verify_api_key};
pub use rate_limit::RateLimiter;
pub use error_handler::{error_handler, json_error_handler, log_error};
