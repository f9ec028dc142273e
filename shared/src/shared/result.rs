use super::error::AppError;

/// The workspace standard return type (§A.3).
pub type AppResult<T> = Result<T, AppError>;
