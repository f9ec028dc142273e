//! §4.5 "Back-pressure" and the submit/read/cancel half of the async job runtime —
//! everything `EnqueueBatchSync`, `EnqueuePrepSheets`, `GetJob`, and `CancelJob` (§6)
//! need that doesn't require a worker.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use screening_service::context::Context;
use shared::domain::entities::healthprep::{
    AsyncJob, AuditEntry, AuditEventType, AuditResourceType, JobPriority, JobStatus, JobType,
};
use shared::domain::repositories::healthprep::{AsyncJobRepository, AuditRepository, FhirApiCallRepository};
use shared::shared::{AppError, AppResult};

use crate::inputs::{encode, BatchPrepSheetsInputs, BatchSyncInputs, PrincipalSnapshot, ScopeKind};

/// Per §4.5: "5 × patient count is a serviceable default" for a full EMR sync (seven
/// fetch stages, most issuing one call each). Write-back jobs make exactly one
/// outbound call per patient (the `DocumentReference` POST) plus none for reads, since
/// prep-sheet compilation is local-data-only.
const BATCH_SYNC_CALLS_PER_PATIENT: i64 = 5;
const BATCH_PREP_SHEETS_CALLS_PER_PATIENT: i64 = 1;

pub struct JobQueue {
    jobs: Arc<dyn AsyncJobRepository>,
    fhir_calls: Arc<dyn FhirApiCallRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl JobQueue {
    pub fn new(
        jobs: Arc<dyn AsyncJobRepository>,
        fhir_calls: Arc<dyn FhirApiCallRepository>,
        audit: Arc<dyn AuditRepository>,
    ) -> Self {
        Self { jobs, fhir_calls, audit }
    }

    /// `EnqueueBatchSync(tenant, patient_ids, priority)` (§6).
    #[allow(clippy::too_many_arguments)]
    pub async fn enqueue_batch_sync(
        &self,
        ctx: &Context,
        patient_ids: Vec<Uuid>,
        priority: JobPriority,
        provider_id: Option<Uuid>,
        scope: ScopeKind,
        force: bool,
    ) -> AppResult<AsyncJob> {
        self.check_batch_size(ctx, patient_ids.len())?;
        self.check_rate_budget(ctx, patient_ids.len() as i64 * BATCH_SYNC_CALLS_PER_PATIENT)
            .await?;

        let inputs = BatchSyncInputs {
            patient_ids: patient_ids.clone(),
            provider_id,
            scope,
            force,
            principal: PrincipalSnapshot {
                user_id: ctx.principal.user_id,
                role: ctx.principal.role,
                accessible_provider_ids: ctx.principal.accessible_provider_ids.clone(),
            },
        };

        let job = AsyncJob::new(
            ctx.tenant_id(),
            ctx.principal.user_id,
            JobType::BatchSync,
            priority,
            patient_ids.len() as i32,
            encode(&inputs),
        );
        self.create_and_audit(ctx, job).await
    }

    /// `EnqueuePrepSheets(tenant, patient_ids, screening_type_ids)` (§6).
    #[allow(clippy::too_many_arguments)]
    pub async fn enqueue_batch_prep_sheets(
        &self,
        ctx: &Context,
        patient_ids: Vec<Uuid>,
        screening_type_ids: Vec<Uuid>,
        priority: JobPriority,
        provider_id: Option<Uuid>,
        scope: ScopeKind,
    ) -> AppResult<AsyncJob> {
        self.check_batch_size(ctx, patient_ids.len())?;
        self.check_rate_budget(
            ctx,
            patient_ids.len() as i64 * BATCH_PREP_SHEETS_CALLS_PER_PATIENT,
        )
        .await?;

        let inputs = BatchPrepSheetsInputs {
            patient_ids: patient_ids.clone(),
            screening_type_ids,
            scope,
            provider_id,
            principal: PrincipalSnapshot {
                user_id: ctx.principal.user_id,
                role: ctx.principal.role,
                accessible_provider_ids: ctx.principal.accessible_provider_ids.clone(),
            },
        };

        let job = AsyncJob::new(
            ctx.tenant_id(),
            ctx.principal.user_id,
            JobType::BatchPrepSheets,
            priority,
            patient_ids.len() as i32,
            encode(&inputs),
        );
        self.create_and_audit(ctx, job).await
    }

    async fn create_and_audit(&self, ctx: &Context, job: AsyncJob) -> AppResult<AsyncJob> {
        let created = self.jobs.create(job).await?;
        self.audit
            .record(AuditEntry::new(
                ctx.tenant_id(),
                Some(ctx.principal.user_id),
                AuditEventType::JobEnqueued,
                AuditResourceType::AsyncJob,
                Some(created.id),
                serde_json::json!({
                    "job_type": created.job_type,
                    "priority": created.priority,
                    "total_items": created.total_items,
                }),
            ))
            .await?;
        info!(job_id = %created.id, tenant_id = %ctx.tenant_id(), "job enqueued");
        Ok(created)
    }

    fn check_batch_size(&self, ctx: &Context, count: usize) -> AppResult<()> {
        if count as i32 > ctx.tenant.caps.max_batch_size {
            return Err(AppError::BatchTooLarge(format!(
                "batch of {count} patients exceeds the tenant's limit of {}",
                ctx.tenant.caps.max_batch_size
            )));
        }
        Ok(())
    }

    async fn check_rate_budget(&self, ctx: &Context, estimated_calls: i64) -> AppResult<()> {
        let since = ctx.clock.now() - Duration::hours(1);
        let used = self.fhir_calls.count_since(ctx.tenant_id(), since).await?;
        let limit = ctx.tenant.caps.hourly_fhir_call_limit as i64;
        if used + estimated_calls > limit {
            return Err(AppError::RateLimitWouldExceed(format!(
                "estimated {estimated_calls} calls would push the tenant over its hourly limit \
                 of {limit} ({used} already used)"
            )));
        }
        Ok(())
    }

    /// `GetJob(job_id)` (§6). Scoped to the job's own tenant — callers enforce that
    /// `ctx.tenant_id() == job.tenant_id` themselves the way every other query-layer
    /// scope check in this workspace is the caller's responsibility (§4.7).
    pub async fn get_job(&self, job_id: Uuid) -> AppResult<Option<AsyncJob>> {
        self.jobs.find_by_id(job_id).await
    }

    pub async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<AsyncJob>> {
        self.jobs.list_for_tenant(tenant_id).await
    }

    /// `CancelJob(job_id)` (§6). Per §4.5 "Cancellation": sets status and writes a
    /// cancellation audit entry; an already-running item finishes, but the worker
    /// checks status before starting the next one and stops there.
    pub async fn cancel_job(&self, ctx: &Context, job_id: Uuid) -> AppResult<AsyncJob> {
        let mut job = self
            .jobs
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;

        if job.tenant_id != ctx.tenant_id() {
            return Err(AppError::Forbidden(format!("job {job_id} belongs to a different tenant")));
        }
        if job.is_terminal() {
            return Err(AppError::Conflict(format!(
                "job {job_id} is already {}",
                job.status
            )));
        }

        job.cancel().map_err(|err| AppError::Conflict(err.to_string()))?;
        let updated = self.jobs.update(job).await?;

        self.audit
            .record(AuditEntry::new(
                ctx.tenant_id(),
                Some(ctx.principal.user_id),
                AuditEventType::JobCancelled,
                AuditResourceType::AsyncJob,
                Some(updated.id),
                serde_json::json!({ "status": updated.status }),
            ))
            .await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::domain::entities::healthprep::{EpicEnvironment, Tenant};
    use std::sync::Mutex;

    struct FakeJobRepo {
        jobs: Mutex<std::collections::HashMap<Uuid, AsyncJob>>,
    }

    impl FakeJobRepo {
        fn new() -> Self {
            Self { jobs: Mutex::new(std::collections::HashMap::new()) }
        }
    }

    #[async_trait]
    impl AsyncJobRepository for FakeJobRepo {
        async fn create(&self, job: AsyncJob) -> AppResult<AsyncJob> {
            self.jobs.lock().unwrap().insert(job.id, job.clone());
            Ok(job)
        }
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AsyncJob>> {
            Ok(self.jobs.lock().unwrap().get(&id).cloned())
        }
        async fn update(&self, job: AsyncJob) -> AppResult<AsyncJob> {
            self.jobs.lock().unwrap().insert(job.id, job.clone());
            Ok(job)
        }
        async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<AsyncJob>> {
            Ok(self
                .jobs
                .lock()
                .unwrap()
                .values()
                .filter(|j| j.tenant_id == tenant_id)
                .cloned()
                .collect())
        }
        async fn list_queued(&self, _limit: u32) -> AppResult<Vec<AsyncJob>> {
            Ok(self
                .jobs
                .lock()
                .unwrap()
                .values()
                .filter(|j| j.status == JobStatus::Queued)
                .cloned()
                .collect())
        }
        async fn count_running_for_tenant(&self, tenant_id: Uuid) -> AppResult<i64> {
            Ok(self
                .jobs
                .lock()
                .unwrap()
                .values()
                .filter(|j| j.tenant_id == tenant_id && j.status == JobStatus::Running)
                .count() as i64)
        }
        async fn find_by_status(&self, status: JobStatus, _limit: u32) -> AppResult<Vec<AsyncJob>> {
            Ok(self
                .jobs
                .lock()
                .unwrap()
                .values()
                .filter(|j| j.status == status)
                .cloned()
                .collect())
        }
    }

    struct FakeFhirCallRepo {
        count: i64,
    }

    #[async_trait]
    impl FhirApiCallRepository for FakeFhirCallRepo {
        async fn record(
            &self,
            call: shared::domain::entities::healthprep::FhirApiCall,
        ) -> AppResult<shared::domain::entities::healthprep::FhirApiCall> {
            Ok(call)
        }
        async fn count_since(&self, _tenant_id: Uuid, _since: chrono::DateTime<Utc>) -> AppResult<i64> {
            Ok(self.count)
        }
    }

    struct FakeAuditRepo;

    #[async_trait]
    impl AuditRepository for FakeAuditRepo {
        async fn record(&self, entry: AuditEntry) -> AppResult<AuditEntry> {
            Ok(entry)
        }
        async fn list_for_tenant(&self, _tenant_id: Uuid, _limit: u32, _offset: u32) -> AppResult<Vec<AuditEntry>> {
            Ok(Vec::new())
        }
        async fn list_for_resource(&self, _resource_id: Uuid) -> AppResult<Vec<AuditEntry>> {
            Ok(Vec::new())
        }
        async fn reparent_tenant_entries(&self, _tenant_id: Uuid) -> AppResult<u64> {
            Ok(0)
        }
    }

    fn test_ctx() -> Context {
        let mut tenant = Tenant::new("acme".into(), "Acme Clinic".into(), EpicEnvironment::Sandbox);
        tenant.caps.max_batch_size = 5;
        tenant.caps.hourly_fhir_call_limit = 100;
        Context::system(tenant)
    }

    #[tokio::test]
    async fn rejects_oversized_batch() {
        let queue = JobQueue::new(
            Arc::new(FakeJobRepo::new()),
            Arc::new(FakeFhirCallRepo { count: 0 }),
            Arc::new(FakeAuditRepo),
        );
        let ctx = test_ctx();
        let patient_ids: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
        let err = queue
            .enqueue_batch_sync(&ctx, patient_ids, JobPriority::Normal, None, ScopeKind::Tenant, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BatchTooLarge(_)));
    }

    #[tokio::test]
    async fn rejects_when_rate_budget_would_be_exceeded() {
        let queue = JobQueue::new(
            Arc::new(FakeJobRepo::new()),
            Arc::new(FakeFhirCallRepo { count: 90 }),
            Arc::new(FakeAuditRepo),
        );
        let ctx = test_ctx();
        // 3 patients * 5 calls = 15; 90 + 15 > 100.
        let patient_ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let err = queue
            .enqueue_batch_sync(&ctx, patient_ids, JobPriority::Normal, None, ScopeKind::Tenant, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RateLimitWouldExceed(_)));
    }

    #[tokio::test]
    async fn enqueues_within_budget() {
        let queue = JobQueue::new(
            Arc::new(FakeJobRepo::new()),
            Arc::new(FakeFhirCallRepo { count: 0 }),
            Arc::new(FakeAuditRepo),
        );
        let ctx = test_ctx();
        let patient_ids: Vec<Uuid> = (0..2).map(|_| Uuid::new_v4()).collect();
        let job = queue
            .enqueue_batch_sync(&ctx, patient_ids, JobPriority::High, None, ScopeKind::Tenant, false)
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.total_items, 2);
    }

    #[tokio::test]
    async fn cancel_is_idempotent_refused_once_terminal() {
        let jobs = Arc::new(FakeJobRepo::new());
        let queue = JobQueue::new(jobs.clone(), Arc::new(FakeFhirCallRepo { count: 0 }), Arc::new(FakeAuditRepo));
        let ctx = test_ctx();
        let job = queue
            .enqueue_batch_sync(&ctx, vec![Uuid::new_v4()], JobPriority::Low, None, ScopeKind::Tenant, false)
            .await
            .unwrap();

        let cancelled = queue.cancel_job(&ctx, job.id).await.unwrap();
        assert_eq!(cancelled.status, JobStatus::Cancelled);

        let err = queue.cancel_job(&ctx, job.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
