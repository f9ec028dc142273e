use tracing::Span;
use uuid::Uuid;

use crate::shared::request_context::RequestContext;

/// Fields attached to every log line emitted while handling one request or one
/// background job item. Mirrors the subset of `RequestContext` that is safe to
/// log verbatim (never PHI) -- tenant/user/request identifiers only.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    pub request_id: Option<String>,
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
}

impl LogContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// Open a tracing span carrying the context's identifiers as structured fields.
pub fn span_with_context(name: &'static str, ctx: &LogContext) -> Span {
    tracing::info_span!(
        "request",
        otel.name = name,
        request_id = ctx.request_id.as_deref().unwrap_or(""),
        tenant_id = ctx.tenant_id.map(|id| id.to_string()).unwrap_or_default(),
        user_id = ctx.user_id.map(|id| id.to_string()).unwrap_or_default(),
    )
}

/// Convenience constructor straight from an authenticated `RequestContext`.
pub fn span_from_request_context(name: &'static str, ctx: &RequestContext) -> Span {
    let log_ctx = LogContext {
        request_id: Some(ctx.request_id.clone()),
        tenant_id: ctx.tenant_id,
        user_id: Some(ctx.user_id),
    };
    span_with_context(name, &log_ctx)
}
