pub mod auth_middleware;
pub mod request_id;

pub use auth_middleware::auth_middleware;
pub use request_id::request_id_middleware;
