//! §4.2 "EMR Sync Pipeline": the fixed-order fetch sequence, merged into the local
//! store, handed off to the `ScreeningEngine` at the end.

use std::sync::Arc;

use base64::Engine as _;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use authz_core::fhir::{CredentialScope, FhirClient};
use shared::domain::entities::healthprep::{
    Appointment, AuditEntry, AuditEventType, AuditResourceType, Patient, PatientCondition,
    PatientDocument, DocumentProcessingStatus, DocumentSource,
};
use shared::domain::repositories::healthprep::{
    AppointmentRepository, AuditRepository, DocumentRepository, PatientRepository,
    ScreeningRepository, ScreeningTypeRepository,
};
use shared::shared::{AppError, AppResult};

use crate::context::Context;
use crate::phi_filter::{redact, safe_title, sanitize_resource, OcrBackend, SanitizerSalt, StructuredCoding};
use crate::screening_engine::ScreeningEngine;
use crate::screening_engine::selective_refresh::{may_skip, SkipCheck};

use super::backoff::with_backoff;
use super::resources::{
    self, bundle_resources, AttachmentSource,
};

/// §4.2: per-stage outcome, folded into the run's stats rather than propagated — a
/// failure in "fetch observations" must not prevent documents or appointments from
/// syncing.
#[derive(Debug, Default)]
pub struct StageFailure {
    pub stage: &'static str,
    pub message: String,
}

/// Result of one `sync_patient` call.
#[derive(Debug, Default)]
pub struct SyncStats {
    pub skipped: bool,
    pub conditions_upserted: u32,
    pub observations_seen: u32,
    pub imaging_reports_created: u32,
    pub documents_processed: u32,
    pub documents_ocr_failed: u32,
    pub encounters_seen: u32,
    pub appointments_upserted: u32,
    pub screenings_changed: usize,
    pub stage_failures: Vec<StageFailure>,
}

impl SyncStats {
    fn fail(&mut self, stage: &'static str, err: AppError) {
        warn!(stage, error = %err, "emr sync stage failed, continuing pipeline");
        self.stage_failures.push(StageFailure { stage, message: err.to_string() });
    }
}

pub struct EmrSyncPipeline {
    fhir: Arc<FhirClient>,
    patients: Arc<dyn PatientRepository>,
    documents: Arc<dyn DocumentRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    screenings: Arc<dyn ScreeningRepository>,
    screening_types: Arc<dyn ScreeningTypeRepository>,
    audit: Arc<dyn AuditRepository>,
    engine: Arc<ScreeningEngine>,
    ocr_backend: Arc<dyn OcrBackend>,
    sanitizer_salt: SanitizerSalt,
}

impl EmrSyncPipeline {
    pub fn new(
        fhir: Arc<FhirClient>,
        patients: Arc<dyn PatientRepository>,
        documents: Arc<dyn DocumentRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        screenings: Arc<dyn ScreeningRepository>,
        screening_types: Arc<dyn ScreeningTypeRepository>,
        audit: Arc<dyn AuditRepository>,
        engine: Arc<ScreeningEngine>,
        ocr_backend: Arc<dyn OcrBackend>,
        sanitizer_salt: SanitizerSalt,
    ) -> Self {
        Self {
            fhir,
            patients,
            documents,
            appointments,
            screenings,
            screening_types,
            audit,
            engine,
            ocr_backend,
            sanitizer_salt,
        }
    }

    /// Drives one patient through the full §4.2 sequence. `scope` determines which
    /// stored credentials back the outbound FHIR calls (§4.3); `provider_id` is the
    /// provider the sync was initiated for, or `None` for an organization-context
    /// (legacy) sync.
    pub async fn sync_patient(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        provider_id: Option<Uuid>,
        epic_patient_id: &str,
        force: bool,
    ) -> AppResult<SyncStats> {
        let mut stats = SyncStats::default();
        let tenant_id = ctx.tenant_id();
        let hourly_limit = ctx.tenant.caps.hourly_fhir_call_limit as i64;

        if let Some(existing) = self.patients.find_by_epic_patient_id(tenant_id, epic_patient_id).await? {
            if self.should_skip(ctx, &existing, force).await? {
                stats.skipped = true;
                return Ok(stats);
            }
        }

        // Step 1: demographics.
        let patient_bundle = with_backoff(|| {
            self.fhir.get(scope, tenant_id, hourly_limit, &format!("Patient/{epic_patient_id}"), &[])
        })
        .await?;
        let demographics = resources::parse_patient(&patient_bundle)
            .ok_or_else(|| AppError::Permanent(format!("malformed Patient resource for {epic_patient_id}")))?;

        let mut patient = match self.patients.find_by_epic_patient_id(tenant_id, epic_patient_id).await? {
            Some(mut existing) => {
                existing.name = demographics.name;
                existing.date_of_birth = demographics.date_of_birth;
                existing.sex = demographics.sex;
                if let Some(mrn) = demographics.mrn {
                    existing.mrn = mrn;
                }
                existing.provider_id = provider_id.or(existing.provider_id);
                self.patients.update(existing).await?
            }
            None => {
                let mut created = Patient::new(
                    tenant_id,
                    demographics.mrn.unwrap_or_else(|| epic_patient_id.to_string()),
                    demographics.name,
                    demographics.date_of_birth,
                    demographics.sex,
                );
                created.epic_patient_id = Some(epic_patient_id.to_string());
                created.provider_id = provider_id;
                self.patients.create(created).await?
            }
        };

        // Step 2: conditions.
        if let Err(err) = self.sync_conditions(ctx, scope, hourly_limit, &patient, &mut stats).await {
            stats.fail("conditions", err);
        }

        // Step 3: observations (filtered, counted only — HealthPrep's trigger
        // matching runs against PatientCondition, not raw lab values).
        if let Err(err) = self.count_observations(ctx, scope, hourly_limit, &patient, &mut stats).await {
            stats.fail("observations", err);
        }

        // Step 4: DiagnosticReports (imaging).
        if let Err(err) = self.sync_imaging_reports(ctx, scope, hourly_limit, &patient, &mut stats).await {
            stats.fail("diagnostic_reports", err);
        }

        // Step 5: DocumentReferences since the document cut-off.
        if let Err(err) = self.sync_document_references(ctx, scope, hourly_limit, &patient, &mut stats).await {
            stats.fail("document_references", err);
        }

        // Step 6: encounters (visit history; counted only, no local entity yet).
        if let Err(err) = self.count_encounters(ctx, scope, hourly_limit, &patient, &mut stats).await {
            stats.fail("encounters", err);
        }

        // Step 7: appointments within the prioritization window.
        if let Err(err) = self
            .sync_appointments(ctx, scope, hourly_limit, &patient, provider_id, &mut stats)
            .await
        {
            stats.fail("appointments", err);
        }

        // Hand off to the screening engine; it stamps last_fhir_sync /
        // documents_last_evaluated_at on success (§4.2 "selective bookkeeping").
        patient = self
            .patients
            .find_by_epic_patient_id(tenant_id, epic_patient_id)
            .await?
            .unwrap_or(patient);
        stats.screenings_changed = self.engine.refresh_patient(ctx, &patient, force).await?;

        self.audit
            .record(AuditEntry::new(
                tenant_id,
                Some(ctx.principal.user_id),
                AuditEventType::EpicSync,
                AuditResourceType::Patient,
                Some(patient.id),
                serde_json::json!({
                    "conditions_upserted": stats.conditions_upserted,
                    "imaging_reports_created": stats.imaging_reports_created,
                    "documents_processed": stats.documents_processed,
                    "appointments_upserted": stats.appointments_upserted,
                    "stage_failures": stats.stage_failures.len(),
                }),
            ))
            .await?;

        Ok(stats)
    }

    /// §4.2 "Preflight": apply §4.1.4 before any network call is made.
    async fn should_skip(&self, ctx: &Context, patient: &Patient, force: bool) -> AppResult<bool> {
        let active_types = self.screening_types.list_active_visible_to_tenant(ctx.tenant_id()).await?;
        let has_prior_screening = !self.screenings.list_for_patient(patient.id).await?.is_empty();
        let latest_document_created_at = self
            .documents
            .list_for_patient_since(patient.id, patient.documents_last_evaluated_at)
            .await?
            .iter()
            .map(|d| d.created_at)
            .max();

        Ok(may_skip(&SkipCheck {
            patient,
            force,
            has_prior_screening,
            active_screening_types: &active_types,
            latest_document_created_at,
        }))
    }

    async fn sync_conditions(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        hourly_limit: i64,
        patient: &Patient,
        stats: &mut SyncStats,
    ) -> AppResult<()> {
        let epic_patient_id = patient.epic_patient_id.as_deref().unwrap_or(&patient.mrn);
        let bundle = with_backoff(|| {
            self.fhir.get(scope, ctx.tenant_id(), hourly_limit, "Condition", &[("patient", epic_patient_id.to_string())])
        })
        .await?;

        let existing = self.patients.list_conditions(patient.id).await?;

        for resource in bundle_resources(&bundle) {
            let Some(fact) = resources::parse_condition(resource) else { continue };
            match existing.iter().find(|c| c.condition_name == fact.condition_name) {
                Some(found) => {
                    if found.active != fact.active {
                        let mut updated = found.clone();
                        updated.active = fact.active;
                        updated.updated_at = Utc::now();
                        self.patients.update_condition(updated).await?;
                        stats.conditions_upserted += 1;
                    }
                }
                None => {
                    let mut condition = PatientCondition::new(ctx.tenant_id(), patient.id, fact.condition_name);
                    condition.icd10_code = fact.icd10_code;
                    condition.active = fact.active;
                    condition.onset_date = fact.onset_date;
                    self.patients.add_condition(condition).await?;
                    stats.conditions_upserted += 1;
                }
            }
        }
        Ok(())
    }

    async fn count_observations(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        hourly_limit: i64,
        patient: &Patient,
        stats: &mut SyncStats,
    ) -> AppResult<()> {
        let epic_patient_id = patient.epic_patient_id.as_deref().unwrap_or(&patient.mrn);
        let bundle = with_backoff(|| {
            self.fhir.get(
                scope,
                ctx.tenant_id(),
                hourly_limit,
                "Observation",
                &[("patient", epic_patient_id.to_string()), ("category", "laboratory,vital-signs".to_string())],
            )
        })
        .await?;
        stats.observations_seen += bundle_resources(&bundle).len() as u32;
        Ok(())
    }

    async fn sync_imaging_reports(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        hourly_limit: i64,
        patient: &Patient,
        stats: &mut SyncStats,
    ) -> AppResult<()> {
        let epic_patient_id = patient.epic_patient_id.as_deref().unwrap_or(&patient.mrn);
        let bundle = with_backoff(|| {
            self.fhir.get(
                scope,
                ctx.tenant_id(),
                hourly_limit,
                "DiagnosticReport",
                &[("patient", epic_patient_id.to_string()), ("category", "IMG".to_string())],
            )
        })
        .await?;

        for resource in bundle_resources(&bundle) {
            if !resources::is_imaging_category(resource) {
                continue;
            }
            let Some(report) = resources::parse_imaging_report(resource) else { continue };
            if self.documents.find_by_source_id(ctx.tenant_id(), &report.source_id).await?.is_some() {
                continue;
            }

            let category_codes: Vec<&str> = report.category_code.as_deref().into_iter().collect();
            let coding = StructuredCoding {
                type_code: report.loinc_code.as_deref(),
                category_codes: &category_codes,
            };
            let mut document = PatientDocument::new(
                ctx.tenant_id(),
                patient.id,
                DocumentSource::Fhir,
                "application/pdf".to_string(),
                report.document_date,
            );
            document.safe_title = safe_title(&coding);
            document.loinc_code = report.loinc_code;
            document.category_code = report.category_code;
            document.source_id = Some(report.source_id);
            document.processing_status = DocumentProcessingStatus::Pending;

            self.documents.create(document).await?;
            stats.imaging_reports_created += 1;
        }
        Ok(())
    }

    async fn sync_document_references(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        hourly_limit: i64,
        patient: &Patient,
        stats: &mut SyncStats,
    ) -> AppResult<()> {
        let epic_patient_id = patient.epic_patient_id.as_deref().unwrap_or(&patient.mrn);
        let cutoff = ctx.clock.today() - chrono::Duration::days(365 * 2);
        let bundle = with_backoff(|| {
            self.fhir.get(
                scope,
                ctx.tenant_id(),
                hourly_limit,
                "DocumentReference",
                &[("patient", epic_patient_id.to_string()), ("date", format!("ge{cutoff}"))],
            )
        })
        .await?;

        for resource in bundle_resources(&bundle) {
            let Some(doc_ref) = resources::parse_document_reference(resource) else { continue };
            if self.documents.find_by_source_id(ctx.tenant_id(), &doc_ref.source_id).await?.is_some() {
                continue;
            }

            let bytes = match self
                .resolve_attachment(ctx, scope, hourly_limit, &doc_ref.attachment)
                .await
            {
                Ok(bytes) => bytes,
                Err(err) => {
                    stats.fail("document_reference_attachment", err);
                    continue;
                }
            };

            let category_codes: Vec<&str> = doc_ref.category_codes.iter().map(String::as_str).collect();
            let coding = StructuredCoding {
                type_code: doc_ref.loinc_code.as_deref(),
                category_codes: &category_codes,
            };
            let mut document = PatientDocument::new(
                ctx.tenant_id(),
                patient.id,
                DocumentSource::Fhir,
                doc_ref.content_type.clone(),
                doc_ref.document_date,
            );
            document.safe_title = safe_title(&coding);
            document.loinc_code = doc_ref.loinc_code;
            document.category_code = doc_ref.category_codes.into_iter().next();
            document.source_id = Some(doc_ref.source_id);

            match bytes {
                Some(bytes) => {
                    let kind = content_kind(&doc_ref.content_type);
                    match crate::phi_filter::extract(self.ocr_backend.as_ref(), &bytes, kind) {
                        Some(ocr) => {
                            let redacted = redact(&ocr.text, &ctx.tenant.phi_filter_settings);
                            document.extracted_text = Some(redacted.text);
                            document.processing_status = DocumentProcessingStatus::PhiFiltered;
                        }
                        None => {
                            document.processing_status = DocumentProcessingStatus::Failed;
                            stats.documents_ocr_failed += 1;
                        }
                    }
                }
                None => {
                    document.processing_status = DocumentProcessingStatus::Failed;
                }
            }

            let _ = sanitize_resource(resource, &self.sanitizer_salt, &ctx.tenant.phi_filter_settings);
            self.documents.create(document).await?;
            stats.documents_processed += 1;
        }
        Ok(())
    }

    async fn resolve_attachment(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        hourly_limit: i64,
        attachment: &AttachmentSource,
    ) -> AppResult<Option<Vec<u8>>> {
        match attachment {
            AttachmentSource::Inline(data) => base64::engine::general_purpose::STANDARD
                .decode(data)
                .map(Some)
                .map_err(|e| AppError::Permanent(format!("malformed base64 attachment data: {e}"))),
            AttachmentSource::BinaryUrl(url) => {
                let resource_path = url.trim_start_matches('/');
                let binary = with_backoff(|| self.fhir.get(scope, ctx.tenant_id(), hourly_limit, resource_path, &[])).await?;
                match binary.get("data").and_then(|d| d.as_str()) {
                    Some(data) => base64::engine::general_purpose::STANDARD
                        .decode(data)
                        .map(Some)
                        .map_err(|e| AppError::Permanent(format!("malformed base64 Binary data: {e}"))),
                    None => Ok(None),
                }
            }
            AttachmentSource::None => Ok(None),
        }
    }

    async fn count_encounters(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        hourly_limit: i64,
        patient: &Patient,
        stats: &mut SyncStats,
    ) -> AppResult<()> {
        let epic_patient_id = patient.epic_patient_id.as_deref().unwrap_or(&patient.mrn);
        let bundle = with_backoff(|| {
            self.fhir.get(scope, ctx.tenant_id(), hourly_limit, "Encounter", &[("patient", epic_patient_id.to_string())])
        })
        .await?;
        stats.encounters_seen += bundle_resources(&bundle).len() as u32;
        Ok(())
    }

    async fn sync_appointments(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        hourly_limit: i64,
        patient: &Patient,
        provider_id: Option<Uuid>,
        stats: &mut SyncStats,
    ) -> AppResult<()> {
        let epic_patient_id = patient.epic_patient_id.as_deref().unwrap_or(&patient.mrn);
        let today = ctx.clock.today();
        let window_end = today + chrono::Duration::days(ctx.tenant.caps.prioritization_window_days as i64);
        let bundle = with_backoff(|| {
            self.fhir.get(
                scope,
                ctx.tenant_id(),
                hourly_limit,
                "Appointment",
                &[
                    ("patient", epic_patient_id.to_string()),
                    ("date", format!("ge{today}")),
                    ("date", format!("le{window_end}")),
                ],
            )
        })
        .await?;

        for resource in bundle_resources(&bundle) {
            let Some(fact) = resources::parse_appointment(resource) else { continue };
            let mut appointment = Appointment::new(ctx.tenant_id(), patient.id, fact.scheduled_at, fact.appointment_type);
            appointment.status = fact.status;
            appointment.source_id = Some(fact.source_id);
            appointment.provider_id = provider_id;
            if !appointment.is_upcoming_and_actionable() {
                continue;
            }
            self.appointments.upsert_by_source_id(appointment).await?;
            stats.appointments_upserted += 1;
        }
        Ok(())
    }
}

fn content_kind(content_type: &str) -> crate::phi_filter::ContentKind {
    use crate::phi_filter::ContentKind;
    if content_type.starts_with("text/") {
        ContentKind::Text
    } else if content_type == "application/pdf" {
        ContentKind::Pdf
    } else {
        ContentKind::Image
    }
}
