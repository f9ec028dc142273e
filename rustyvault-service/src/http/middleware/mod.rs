//! Middleware for vault HTTP layer

pub mod auth_middleware;
pub mod rate_limit;

pub use auth_middleware::auth_middleware;
pub use rate_limit::{RateLimiter, rate_limit_middleware};

