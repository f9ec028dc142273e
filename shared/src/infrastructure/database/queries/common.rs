/// Database health check query
pub const HEALTH_CHECK: &str = "SELECT 1";

/// Get PostgreSQL version
pub const VERSION_SELECT: &str = "SELECT version()";

