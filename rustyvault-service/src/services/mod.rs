pub mod audit_logger;
pub mod key_storage;

pub use audit_logger::{AuditLogEntry, AuditLogger, AuthResult};
pub use key_storage::KeyStorage;
