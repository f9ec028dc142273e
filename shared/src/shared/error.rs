use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// §7: no usable Epic token exists for this tenant/provider and no refresh token
    /// is available either — the caller must run an authorization flow.
    #[error("Authentication with the EMR is required: {0}")]
    AuthRequired(String),

    /// §7: a refresh attempt itself failed (expired/revoked refresh token).
    #[error("Re-authentication with the EMR is required: {0}")]
    ReauthRequired(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// §4.5/§5 back-pressure: the request would push the tenant over its hourly cap.
    #[error("Request would exceed the tenant's rate limit: {0}")]
    RateLimitWouldExceed(String),

    /// §4.5/§5 back-pressure: the batch exceeds the tenant's `max_batch_size`.
    #[error("Batch too large: {0}")]
    BatchTooLarge(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("PHI filter failed: {0}")]
    PhiFilterFailed(String),

    /// §9 Design Notes: a sandbox Epic environment lacking a capability the
    /// corresponding production environment has.
    #[error("Sandbox limitation: {0}")]
    SandboxLimitation(String),

    /// §7: retryable outbound-call failure (timeout, 5xx, connection reset).
    #[error("Transient error: {0}")]
    Transient(String),

    /// §7: non-retryable outbound-call failure (4xx other than 401/429).
    #[error("Permanent error: {0}")]
    Permanent(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Database,
    Encryption,
    Authentication,
    Authorization,
    /// Alias HTTP-facing name for `Authentication` — used at the `api-service` boundary.
    Unauthorized,
    Configuration,
    Storage,
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    InvalidState,
    AuthRequired,
    ReauthRequired,
    RateLimitExceeded,
    RateLimitWouldExceed,
    BatchTooLarge,
    OcrFailed,
    PhiFilterFailed,
    SandboxLimitation,
    Transient,
    Permanent,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(_) => ErrorKind::Database,
            AppError::Encryption(_) => ErrorKind::Encryption,
            AppError::Authentication(_) => ErrorKind::Unauthorized,
            AppError::Authorization(_) => ErrorKind::Authorization,
            AppError::Configuration(_) => ErrorKind::Configuration,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::AuthRequired(_) => ErrorKind::AuthRequired,
            AppError::ReauthRequired(_) => ErrorKind::ReauthRequired,
            AppError::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            AppError::RateLimitWouldExceed(_) => ErrorKind::RateLimitWouldExceed,
            AppError::BatchTooLarge(_) => ErrorKind::BatchTooLarge,
            AppError::OcrFailed(_) => ErrorKind::OcrFailed,
            AppError::PhiFilterFailed(_) => ErrorKind::PhiFilterFailed,
            AppError::SandboxLimitation(_) => ErrorKind::SandboxLimitation,
            AppError::Transient(_) => ErrorKind::Transient,
            AppError::Permanent(_) => ErrorKind::Permanent,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<AppError> for ErrorKind {
    fn from(err: AppError) -> Self {
        err.kind()
    }
}
