pub mod api_key;
pub mod rate_limit;

pub use api_key::{authenticate, valid_key_format, PostgresUserProvider, UserProvider};
pub use rate_limit::RateLimiter;
