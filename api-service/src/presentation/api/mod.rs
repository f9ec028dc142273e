pub mod routes;
pub mod handlers;
pub mod middleware;

pub use routes::create_router;
pub use crate::AppState;
