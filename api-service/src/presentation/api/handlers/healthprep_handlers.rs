//! §6 "Inbound HTTP": the thin routing layer's six core operations. Each handler
//! resolves the calling tenant/principal into a `screening_service::context::Context`
//! and then does nothing but call into the core — no business logic lives here.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use screening_service::context::{Context, Principal, Role, SystemClock};
use shared::domain::entities::healthprep::{JobPriority, Tenant};
use shared::domain::repositories::healthprep::{PatientRepository, ScreeningRepository};
use shared::shared::AppError;
use shared::RequestContext;

use jobs_service::ScopeKind;

use super::super::AppState;

fn parse_role(role: Option<&str>) -> Result<Role, AppError> {
    match role {
        Some("root_admin") => Ok(Role::RootAdmin),
        Some("admin") => Ok(Role::Admin),
        Some("nurse") => Ok(Role::Nurse),
        Some("staff") => Ok(Role::Staff),
        Some("practitioner") => Ok(Role::Practitioner),
        Some(other) => Err(AppError::Authorization(format!("unrecognized role: {other}"))),
        None => Err(AppError::Authorization("request carries no role".into())),
    }
}

/// Resolves the authenticated request into a core `Context`: the tenant row, the
/// principal (role + accessible providers), and the system clock. Every HealthPrep
/// operation is tenant-scoped (§3 "User"), so a missing `tenant_id` on the token is
/// a 400, not a silently-global request.
async fn resolve_context(state: &AppState, request_ctx: &RequestContext) -> Result<Context, AppError> {
    let tenant_id = request_ctx
        .tenant_id
        .ok_or_else(|| AppError::Validation("request carries no tenant scope".into()))?;

    let tenant: Tenant = state
        .tenant_repository
        .find_by_id(tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("tenant {tenant_id} not found")))?;

    let role = parse_role(request_ctx.role.as_deref())?;
    let accessible_provider_ids = if role.bypasses_provider_scope() {
        Vec::new()
    } else {
        state.provider_repository.accessible_provider_ids(request_ctx.user_id).await?
    };

    let principal = Principal {
        user_id: request_ctx.user_id,
        role,
        accessible_provider_ids,
    };

    Ok(Context::new(tenant, principal, Arc::new(SystemClock)))
}

fn error_status(err: &AppError) -> StatusCode {
    match err {
        AppError::Validation(_) => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Forbidden(_) | AppError::Authorization(_) => StatusCode::FORBIDDEN,
        AppError::Authentication(_) | AppError::AuthRequired(_) | AppError::ReauthRequired(_) => {
            StatusCode::UNAUTHORIZED
        }
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::BatchTooLarge(_) | AppError::RateLimitWouldExceed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: AppError) -> axum::response::Response {
    let status = error_status(&err);
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

#[derive(Debug, Deserialize)]
pub struct EnqueueBatchSyncRequest {
    pub patient_ids: Vec<Uuid>,
    #[serde(default)]
    pub priority: Option<JobPriority>,
    #[serde(default)]
    pub provider_id: Option<Uuid>,
    #[serde(default = "default_scope_kind")]
    pub scope: ScopeKind,
    #[serde(default)]
    pub force: bool,
}

fn default_scope_kind() -> ScopeKind {
    ScopeKind::Tenant
}

/// `EnqueueBatchSync(tenant, patient_ids, priority)` (§6).
pub async fn enqueue_batch_sync(
    State(state): State<Arc<AppState>>,
    request_ctx: RequestContext,
    Json(request): Json<EnqueueBatchSyncRequest>,
) -> impl IntoResponse {
    let ctx = match resolve_context(&state, &request_ctx).await {
        Ok(ctx) => ctx,
        Err(err) => return error_response(err),
    };

    match state
        .job_queue
        .enqueue_batch_sync(
            &ctx,
            request.patient_ids,
            request.priority.unwrap_or(JobPriority::Normal),
            request.provider_id,
            request.scope,
            request.force,
        )
        .await
    {
        Ok(job) => (StatusCode::ACCEPTED, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct EnqueuePrepSheetsRequest {
    pub patient_ids: Vec<Uuid>,
    #[serde(default)]
    pub screening_type_ids: Vec<Uuid>,
    #[serde(default)]
    pub priority: Option<JobPriority>,
    #[serde(default)]
    pub provider_id: Option<Uuid>,
    #[serde(default = "default_scope_kind")]
    pub scope: ScopeKind,
}

/// `EnqueuePrepSheets(tenant, patient_ids, screening_type_ids)` (§6).
pub async fn enqueue_prep_sheets(
    State(state): State<Arc<AppState>>,
    request_ctx: RequestContext,
    Json(request): Json<EnqueuePrepSheetsRequest>,
) -> impl IntoResponse {
    let ctx = match resolve_context(&state, &request_ctx).await {
        Ok(ctx) => ctx,
        Err(err) => return error_response(err),
    };

    match state
        .job_queue
        .enqueue_batch_prep_sheets(
            &ctx,
            request.patient_ids,
            request.screening_type_ids,
            request.priority.unwrap_or(JobPriority::Normal),
            request.provider_id,
            request.scope,
        )
        .await
    {
        Ok(job) => (StatusCode::ACCEPTED, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

/// `GetJob(job_id)` (§6). Scoped to the caller's own tenant.
pub async fn get_job(
    State(state): State<Arc<AppState>>,
    request_ctx: RequestContext,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    let ctx = match resolve_context(&state, &request_ctx).await {
        Ok(ctx) => ctx,
        Err(err) => return error_response(err),
    };

    match state.job_queue.get_job(job_id).await {
        Ok(Some(job)) if job.tenant_id == ctx.tenant_id() => (StatusCode::OK, Json(job)).into_response(),
        Ok(Some(_)) => error_response(AppError::Forbidden(format!("job {job_id} belongs to a different tenant"))),
        Ok(None) => error_response(AppError::NotFound(format!("job {job_id} not found"))),
        Err(err) => error_response(err),
    }
}

/// `CancelJob(job_id)` (§6).
pub async fn cancel_job(
    State(state): State<Arc<AppState>>,
    request_ctx: RequestContext,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse {
    let ctx = match resolve_context(&state, &request_ctx).await {
        Ok(ctx) => ctx,
        Err(err) => return error_response(err),
    };

    match state.job_queue.cancel_job(&ctx, job_id).await {
        Ok(job) => (StatusCode::OK, Json(job)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct ListScreeningsQuery {
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    #[serde(default)]
    pub include_superseded: bool,
}

/// `ListScreenings(tenant, filters)` (§6). `filters.patient_id` narrows to one
/// patient; otherwise every screening the caller's provider scope can see.
pub async fn list_screenings(
    State(state): State<Arc<AppState>>,
    request_ctx: RequestContext,
    Query(query): Query<ListScreeningsQuery>,
) -> impl IntoResponse {
    let ctx = match resolve_context(&state, &request_ctx).await {
        Ok(ctx) => ctx,
        Err(err) => return error_response(err),
    };

    if let Some(patient_id) = query.patient_id {
        let scope = ctx.provider_scope();
        let patient = match state.patient_repository.find_by_id(&scope, patient_id).await {
            Ok(Some(patient)) => patient,
            Ok(None) => return error_response(AppError::NotFound(format!("patient {patient_id} not found"))),
            Err(err) => return error_response(err),
        };
        let screenings = match state.screening_repository.list_for_patient(patient.id).await {
            Ok(screenings) => screenings,
            Err(err) => return error_response(err),
        };
        let screenings: Vec<_> = screenings
            .into_iter()
            .filter(|s| {
                query.include_superseded
                    || s.status != shared::domain::entities::healthprep::ScreeningStatus::Superseded
            })
            .collect();
        return (StatusCode::OK, Json(screenings)).into_response();
    }

    match state
        .screening_repository
        .list_for_scope(&ctx.provider_scope(), query.include_superseded)
        .await
    {
        Ok(screenings) => (StatusCode::OK, Json(screenings)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub struct GetPrepSheetQuery {
    /// Comma-separated screening-type ids; absent means every active screening.
    #[serde(default)]
    pub screening_type_ids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PrepSheetResponse {
    #[serde(flatten)]
    pub data: screening_service::prep_sheet::PrepSheetData,
}

/// `GetPrepSheet(patient_id)` (§6).
pub async fn get_prep_sheet(
    State(state): State<Arc<AppState>>,
    request_ctx: RequestContext,
    Path(patient_id): Path<Uuid>,
    Query(query): Query<GetPrepSheetQuery>,
) -> impl IntoResponse {
    let ctx = match resolve_context(&state, &request_ctx).await {
        Ok(ctx) => ctx,
        Err(err) => return error_response(err),
    };

    let scope = ctx.provider_scope();
    let patient = match state.patient_repository.find_by_id(&scope, patient_id).await {
        Ok(Some(patient)) => patient,
        Ok(None) => return error_response(AppError::NotFound(format!("patient {patient_id} not found"))),
        Err(err) => return error_response(err),
    };

    let screening_type_ids: Option<Vec<Uuid>> = query.screening_type_ids.as_deref().map(|raw| {
        raw.split(',')
            .filter_map(|part| Uuid::parse_str(part.trim()).ok())
            .collect()
    });

    let result = match &screening_type_ids {
        Some(ids) => state.prep_sheet_compiler.compile_filtered(&ctx, &patient, Some(ids)).await,
        None => state.prep_sheet_compiler.compile(&ctx, &patient).await,
    };

    match result {
        Ok(data) => (StatusCode::OK, Json(PrepSheetResponse { data })).into_response(),
        Err(err) => error_response(err),
    }
}
