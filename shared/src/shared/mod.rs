pub mod error;
pub mod result;
pub mod masking;
pub mod app_state;
pub mod request_context;
pub mod audit;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use app_state::AppState;
pub use request_context::RequestContext;
pub use audit::{AuditFields, HasAuditFields, AuditContext};

