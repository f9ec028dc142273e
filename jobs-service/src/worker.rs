//! §4.5 "Worker contract" / §5 "Suspension points": claims at most one job at a time,
//! re-reads status before each item, reports progress idempotently, and marks the job
//! `failed` (truncated message, partial progress preserved) on an unhandled error
//! rather than aborting the whole batch.

use std::sync::Arc;

use authz_core::fhir::{CredentialScope, FhirClientFactory};
use chrono::Utc;
use screening_service::context::{Context, Principal, SystemClock};
use screening_service::emr_sync::EmrSyncPipeline;
use screening_service::phi_filter::{OcrBackend, SanitizerSalt};
use screening_service::prep_sheet::{render_html, PdfRenderer, PrepSheetCompiler, PrepSheetWriteBack};
use screening_service::screening_engine::ScreeningEngine;
use shared::domain::entities::healthprep::{AsyncJob, JobStatus, JobType, Patient, Tenant};
use shared::domain::repositories::healthprep::{
    AppointmentRepository, AsyncJobRepository, AuditRepository, DocumentRepository, PatientRepository,
    ScreeningRepository, ScreeningTypeRepository, TenantRepository,
};
use shared::shared::{AppError, AppResult};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::inputs::{
    decode, encode, BatchPrepSheetsInputs, BatchPrepSheetsResults, BatchSyncInputs,
    BatchSyncResults, JobItemFailure, PrincipalSnapshot, ScopeKind,
};

fn resolve_scope(kind: ScopeKind, tenant_id: Uuid, provider_id: Option<Uuid>) -> AppResult<CredentialScope> {
    match kind {
        ScopeKind::Tenant => Ok(CredentialScope::Tenant(tenant_id)),
        ScopeKind::Provider => provider_id
            .map(CredentialScope::Provider)
            .ok_or_else(|| AppError::Internal("provider-scoped job missing provider_id".into())),
    }
}

fn principal_for(snapshot: &PrincipalSnapshot) -> Principal {
    Principal {
        user_id: snapshot.user_id,
        role: snapshot.role,
        accessible_provider_ids: snapshot.accessible_provider_ids.clone(),
    }
}

enum JobOutcome {
    Cancelled,
    Failed(String),
}

/// Executes the units of work a worker thread drives against a single claimed job.
/// Grounded on the pipeline/compiler/write-back collaborators each job type already
/// dispatches to; the worker's own job is just the claim/cancel/progress loop wrapped
/// around them.
///
/// `fhir_clients` builds (and caches) the tenant-scoped `FhirClient` each sync needs
/// (§4.3: "one instance per tenant's Epic registration") — the pipeline and
/// write-back collaborators that wrap one are therefore assembled per job rather than
/// held fixed, since two jobs in flight may belong to different tenants.
#[allow(clippy::too_many_arguments)]
pub struct JobExecutor {
    jobs: Arc<dyn AsyncJobRepository>,
    tenants: Arc<dyn TenantRepository>,
    patients: Arc<dyn PatientRepository>,
    documents: Arc<dyn DocumentRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    screenings: Arc<dyn ScreeningRepository>,
    screening_types: Arc<dyn ScreeningTypeRepository>,
    audit: Arc<dyn AuditRepository>,
    engine: Arc<ScreeningEngine>,
    ocr_backend: Arc<dyn OcrBackend>,
    sanitizer_salt: SanitizerSalt,
    fhir_clients: Arc<FhirClientFactory>,
    prep_sheets: Arc<PrepSheetCompiler>,
    pdf_renderer: Arc<dyn PdfRenderer>,
}

impl JobExecutor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jobs: Arc<dyn AsyncJobRepository>,
        tenants: Arc<dyn TenantRepository>,
        patients: Arc<dyn PatientRepository>,
        documents: Arc<dyn DocumentRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        screenings: Arc<dyn ScreeningRepository>,
        screening_types: Arc<dyn ScreeningTypeRepository>,
        audit: Arc<dyn AuditRepository>,
        engine: Arc<ScreeningEngine>,
        ocr_backend: Arc<dyn OcrBackend>,
        sanitizer_salt: SanitizerSalt,
        fhir_clients: Arc<FhirClientFactory>,
        prep_sheets: Arc<PrepSheetCompiler>,
        pdf_renderer: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self {
            jobs,
            tenants,
            patients,
            documents,
            appointments,
            screenings,
            screening_types,
            audit,
            engine,
            ocr_backend,
            sanitizer_salt,
            fhir_clients,
            prep_sheets,
            pdf_renderer,
        }
    }

    async fn pipeline_for(&self, tenant: &Tenant) -> AppResult<EmrSyncPipeline> {
        let fhir = self.fhir_clients.for_tenant(tenant).await?;
        Ok(EmrSyncPipeline::new(
            fhir,
            self.patients.clone(),
            self.documents.clone(),
            self.appointments.clone(),
            self.screenings.clone(),
            self.screening_types.clone(),
            self.audit.clone(),
            self.engine.clone(),
            self.ocr_backend.clone(),
            self.sanitizer_salt.clone(),
        ))
    }

    async fn write_back_for(&self, tenant: &Tenant) -> AppResult<PrepSheetWriteBack> {
        let fhir = self.fhir_clients.for_tenant(tenant).await?;
        Ok(PrepSheetWriteBack::new(fhir, self.audit.clone()))
    }

    /// Claims `job` (already popped off the queue by the runtime) and runs it to a
    /// terminal state. Never returns an error: every failure is folded into the job
    /// record itself, per §4.5's "an unhandled exception marks the job failed".
    pub async fn run(&self, mut job: AsyncJob) {
        let job_id = job.id;
        if let Err(err) = job.start() {
            warn!(job_id = %job_id, error = %err, "job could not transition to running, skipping");
            return;
        }
        if let Err(err) = self.jobs.update(job.clone()).await {
            error!(job_id = %job_id, error = %err, "failed to persist running transition");
            return;
        }

        let outcome = match job.job_type {
            JobType::BatchSync => self.run_batch_sync(&job).await,
            JobType::BatchPrepSheets => self.run_batch_prep_sheets(&job).await,
        };

        match outcome {
            Ok(results) => {
                job.results = Some(results);
                if let Err(err) = job.complete() {
                    warn!(job_id = %job_id, error = %err, "could not mark job complete (likely cancelled mid-run)");
                }
            }
            Err(JobOutcome::Cancelled) => {
                info!(job_id = %job_id, "job observed cancellation, stopping between items");
            }
            Err(JobOutcome::Failed(message)) => {
                if let Err(err) = job.fail(message) {
                    error!(job_id = %job_id, error = %err, "could not mark job failed");
                }
            }
        }

        if let Err(err) = self.jobs.update(job).await {
            error!(job_id = %job_id, error = %err, "failed to persist terminal job state");
        }
    }

    /// Re-reads the job's row and returns `true` if it has been cancelled — the
    /// §4.5 "before each item, re-read status" check.
    async fn is_cancelled(&self, job_id: Uuid) -> bool {
        match self.jobs.find_by_id(job_id).await {
            Ok(Some(current)) => current.status == JobStatus::Cancelled,
            _ => false,
        }
    }

    fn context_for(&self, tenant: Tenant, snapshot: &PrincipalSnapshot) -> Context {
        Context::new(tenant, principal_for(snapshot), Arc::new(SystemClock))
    }

    async fn run_batch_sync(&self, job: &AsyncJob) -> Result<serde_json::Value, JobOutcome> {
        let inputs: BatchSyncInputs = decode(&job.inputs).map_err(|e| JobOutcome::Failed(e.to_string()))?;
        let tenant = self.find_tenant(job.tenant_id).await?;
        let deadline = Utc::now() + chrono::Duration::seconds(tenant.caps.per_job_wall_clock_ceiling_seconds);
        let scope = resolve_scope(inputs.scope, job.tenant_id, inputs.provider_id)
            .map_err(|e| JobOutcome::Failed(e.to_string()))?;
        let ctx = self.context_for(tenant, &inputs.principal);
        let provider_scope = ctx.provider_scope();
        let pipeline = self.pipeline_for(&ctx.tenant).await.map_err(|e| JobOutcome::Failed(e.to_string()))?;

        let mut results = BatchSyncResults::default();
        for patient_id in &inputs.patient_ids {
            if Utc::now() > deadline {
                warn!(job_id = %job.id, "job exceeded its per-job wall-clock ceiling, stopping early");
                break;
            }
            if self.is_cancelled(job.id).await {
                return Err(JobOutcome::Cancelled);
            }

            let patient = match self.patients.find_by_id(&provider_scope, *patient_id).await {
                Ok(Some(p)) => p,
                Ok(None) => {
                    self.record_item_failure(job.id, &mut results.failed, *patient_id, "patient not found").await;
                    continue;
                }
                Err(err) => {
                    self.record_item_failure(job.id, &mut results.failed, *patient_id, &err.to_string()).await;
                    continue;
                }
            };
            let Some(epic_patient_id) = patient.epic_patient_id.clone() else {
                self.record_item_failure(job.id, &mut results.failed, *patient_id, "patient has no Epic id").await;
                continue;
            };

            match pipeline
                .sync_patient(&ctx, scope, inputs.provider_id, &epic_patient_id, inputs.force)
                .await
            {
                Ok(_) => {
                    results.synced.push(*patient_id);
                    self.record_progress(job.id, true).await;
                }
                Err(err) => {
                    self.record_item_failure(job.id, &mut results.failed, *patient_id, &err.to_string()).await;
                }
            }
        }

        Ok(encode(&results))
    }

    async fn run_batch_prep_sheets(&self, job: &AsyncJob) -> Result<serde_json::Value, JobOutcome> {
        let inputs: BatchPrepSheetsInputs =
            decode(&job.inputs).map_err(|e| JobOutcome::Failed(e.to_string()))?;
        let tenant = self.find_tenant(job.tenant_id).await?;
        let deadline = Utc::now() + chrono::Duration::seconds(tenant.caps.per_job_wall_clock_ceiling_seconds);
        let scope = resolve_scope(inputs.scope, job.tenant_id, inputs.provider_id)
            .map_err(|e| JobOutcome::Failed(e.to_string()))?;
        let ctx = self.context_for(tenant, &inputs.principal);
        let provider_scope = ctx.provider_scope();
        let write_back = self.write_back_for(&ctx.tenant).await.map_err(|e| JobOutcome::Failed(e.to_string()))?;

        let filter = if inputs.screening_type_ids.is_empty() {
            None
        } else {
            Some(inputs.screening_type_ids.as_slice())
        };

        let mut results = BatchPrepSheetsResults::default();
        for patient_id in &inputs.patient_ids {
            if Utc::now() > deadline {
                warn!(job_id = %job.id, "job exceeded its per-job wall-clock ceiling, stopping early");
                break;
            }
            if self.is_cancelled(job.id).await {
                return Err(JobOutcome::Cancelled);
            }

            let patient = match self.patients.find_by_id(&provider_scope, *patient_id).await {
                Ok(Some(p)) => p,
                Ok(None) => {
                    self.record_item_failure(job.id, &mut results.failed, *patient_id, "patient not found").await;
                    continue;
                }
                Err(err) => {
                    self.record_item_failure(job.id, &mut results.failed, *patient_id, &err.to_string()).await;
                    continue;
                }
            };

            match self.generate_and_write_back(&ctx, &write_back, scope, &patient, filter).await {
                Ok(()) => {
                    results.generated.push(*patient_id);
                    self.record_progress(job.id, true).await;
                }
                Err(err) => {
                    self.record_item_failure(job.id, &mut results.failed, *patient_id, &err.to_string()).await;
                }
            }
        }

        Ok(encode(&results))
    }

    async fn find_tenant(&self, tenant_id: Uuid) -> Result<Tenant, JobOutcome> {
        self.tenants
            .find_by_id(tenant_id)
            .await
            .map_err(|e| JobOutcome::Failed(e.to_string()))?
            .ok_or_else(|| JobOutcome::Failed(format!("tenant {tenant_id} not found")))
    }

    async fn generate_and_write_back(
        &self,
        ctx: &Context,
        write_back: &PrepSheetWriteBack,
        scope: CredentialScope,
        patient: &Patient,
        screening_type_ids: Option<&[Uuid]>,
    ) -> AppResult<()> {
        let data = self.prep_sheets.compile_filtered(ctx, patient, screening_type_ids).await?;
        let summary = data.compact_summary();
        let html = render_html(&data, &ctx.tenant.display_name, ctx.clock.now());
        let pdf_bytes = self.pdf_renderer.render(&html)?;
        write_back.write_back(ctx, scope, patient, &pdf_bytes, &summary).await?;
        Ok(())
    }

    async fn record_progress(&self, job_id: Uuid, succeeded: bool) {
        if let Ok(Some(mut job)) = self.jobs.find_by_id(job_id).await {
            job.record_item_progress(succeeded);
            let _ = self.jobs.update(job).await;
        }
    }

    async fn record_item_failure(
        &self,
        job_id: Uuid,
        failures: &mut Vec<JobItemFailure>,
        patient_id: Uuid,
        message: &str,
    ) {
        warn!(job_id = %job_id, patient_id = %patient_id, error = message, "job item failed, continuing batch");
        failures.push(JobItemFailure { patient_id, message: message.to_string() });
        self.record_progress(job_id, false).await;
    }
}
