//! §4.6 "Write-back": POST a `DocumentReference` carrying the rendered prep sheet
//! back to the EMR, or simulate one under the tenant's dry-run setting.

use std::sync::Arc;

use base64::Engine as _;
use tracing::warn;

use authz_core::fhir::{CredentialScope, FhirClient};
use shared::domain::entities::healthprep::{AuditEntry, AuditEventType, AuditResourceType, Patient};
use shared::domain::repositories::healthprep::AuditRepository;
use shared::shared::{AppError, AppResult};

use crate::context::Context;

/// §4.6: "LOINC 11506-3".
pub const WRITE_BACK_LOINC_CODE: &str = "11506-3";

#[derive(Debug, Clone)]
pub struct WriteBackResult {
    pub epic_document_id: String,
    pub dry_run: bool,
}

pub struct PrepSheetWriteBack {
    fhir: Arc<FhirClient>,
    audit: Arc<dyn AuditRepository>,
}

impl PrepSheetWriteBack {
    pub fn new(fhir: Arc<FhirClient>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { fhir, audit }
    }

    /// `summary` is the compact screening-status summary (`PrepSheetData::compact_summary`);
    /// per §4.6 it's the only thing besides the timestamp the title may carry.
    pub async fn write_back(
        &self,
        ctx: &Context,
        scope: CredentialScope,
        patient: &Patient,
        pdf_bytes: &[u8],
        summary: &str,
    ) -> AppResult<WriteBackResult> {
        let epic_patient_id = patient.epic_patient_id.as_deref().ok_or_else(|| {
            AppError::Permanent(format!(
                "patient {} has no Epic patient id; sync with Epic first",
                patient.id
            ))
        })?;

        let generated_at = ctx.clock.now();
        let title = format!("{} - {}", generated_at.format("%Y-%m-%d %H:%M UTC"), summary);
        let pdf_base64 = base64::engine::general_purpose::STANDARD.encode(pdf_bytes);

        let document_reference = serde_json::json!({
            "resourceType": "DocumentReference",
            "status": "current",
            "type": {
                "coding": [{
                    "system": "http://loinc.org",
                    "code": WRITE_BACK_LOINC_CODE,
                    "display": "Progress Note",
                }],
            },
            "subject": { "reference": format!("Patient/{epic_patient_id}") },
            "date": generated_at.to_rfc3339(),
            "description": title,
            "content": [{
                "attachment": {
                    "contentType": "application/pdf",
                    "data": pdf_base64,
                    "title": title,
                },
            }],
        });

        let result = if ctx.tenant.write_back_dry_run {
            warn!(
                patient_id = %patient.id,
                "prep sheet write-back dry-run: DocumentReference not sent to Epic"
            );
            WriteBackResult {
                epic_document_id: format!("DRY-RUN-{}", generated_at.format("%Y%m%d_%H%M%S")),
                dry_run: true,
            }
        } else {
            let hourly_limit = ctx.tenant.caps.hourly_fhir_call_limit as i64;
            let response = self
                .fhir
                .post(scope, ctx.tenant_id(), hourly_limit, "DocumentReference", document_reference)
                .await?;
            let epic_document_id = response
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| AppError::Permanent("Epic DocumentReference response missing id".to_string()))?
                .to_string();
            WriteBackResult { epic_document_id, dry_run: false }
        };

        self.audit
            .record(AuditEntry::new(
                ctx.tenant_id(),
                Some(ctx.principal.user_id),
                AuditEventType::EpicDocumentWrite,
                AuditResourceType::Document,
                Some(patient.id),
                serde_json::json!({
                    "epic_document_id": result.epic_document_id,
                    "dry_run": result.dry_run,
                }),
            ))
            .await?;

        Ok(result)
    }
}
