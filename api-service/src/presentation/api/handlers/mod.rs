// Re-export AppState for handler modules
pub use super::AppState;

pub mod auth_handlers;
pub mod healthprep_handlers;
pub mod setup_handlers;

pub use auth_handlers::*;
pub use healthprep_handlers::*;
pub use setup_handlers::*;
