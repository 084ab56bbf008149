mod error_handler;
mod rate_limit;

pub use error_handler::log_errors;
pub use rate_limit::{RateLimitPolicy, client_address, rate_limit};
