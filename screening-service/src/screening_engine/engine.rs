//! §4.1 "Screening Engine" orchestrator: `RefreshPatient` / `RefreshAllInTenant`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use shared::domain::entities::healthprep::{
    AuditEntry, AuditEventType, AuditResourceType, Patient, Screening, ScreeningType,
};
use shared::domain::repositories::healthprep::{
    AuditRepository, DocumentRepository, PatientRepository, ScreeningRepository,
    ScreeningTypeRepository,
};
use shared::shared::AppResult;

use crate::context::Context;

use super::document_match::{evaluate_document_evidence, EvidenceCandidate};
use super::eligibility::evaluate_eligibility;
use super::immunization::{evaluate_immunization, ImmunizationOutcome, ImmunizationRecord};
use super::selective_refresh::{may_skip, SkipCheck};

/// §4.1.5: fetches FHIR Immunization resources filtered by CVX code. Implemented by the
/// `emr_sync` crate module against the authz-core FHIR client; a no-op stub is used
/// wherever the engine runs without live EMR access (e.g. local-document-only tenants).
#[async_trait]
pub trait ImmunizationSource: Send + Sync {
    async fn fetch(
        &self,
        tenant_id: Uuid,
        patient: &Patient,
        cvx_codes: &[String],
    ) -> AppResult<Vec<ImmunizationRecord>>;
}

/// Always returns no immunization records — used where the engine has no EMR
/// connectivity configured (tests, local-document-only deployments).
pub struct NoImmunizationSource;

#[async_trait]
impl ImmunizationSource for NoImmunizationSource {
    async fn fetch(
        &self,
        _tenant_id: Uuid,
        _patient: &Patient,
        _cvx_codes: &[String],
    ) -> AppResult<Vec<ImmunizationRecord>> {
        Ok(Vec::new())
    }
}

pub struct ScreeningEngine {
    patients: Arc<dyn PatientRepository>,
    screening_types: Arc<dyn ScreeningTypeRepository>,
    screenings: Arc<dyn ScreeningRepository>,
    documents: Arc<dyn DocumentRepository>,
    audit: Arc<dyn AuditRepository>,
    immunizations: Arc<dyn ImmunizationSource>,
}

impl ScreeningEngine {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        screening_types: Arc<dyn ScreeningTypeRepository>,
        screenings: Arc<dyn ScreeningRepository>,
        documents: Arc<dyn DocumentRepository>,
        audit: Arc<dyn AuditRepository>,
        immunizations: Arc<dyn ImmunizationSource>,
    ) -> Self {
        Self {
            patients,
            screening_types,
            screenings,
            documents,
            audit,
            immunizations,
        }
    }

    /// §4.1 `RefreshPatient(patient, force) -> int`: returns the number of screening
    /// records created or updated.
    pub async fn refresh_patient(
        &self,
        ctx: &Context,
        patient: &Patient,
        force: bool,
    ) -> AppResult<usize> {
        let active_types = self
            .screening_types
            .list_active_visible_to_tenant(ctx.tenant_id())
            .await?;

        let existing_screenings = self.screenings.list_for_patient(patient.id).await?;
        let by_type: HashMap<Uuid, Screening> = existing_screenings
            .into_iter()
            .map(|s| (s.screening_type_id, s))
            .collect();

        if may_skip(&SkipCheck {
            patient,
            force,
            has_prior_screening: !by_type.is_empty(),
            active_screening_types: &active_types,
            latest_document_created_at: self
                .documents
                .list_for_patient_since(patient.id, patient.documents_last_evaluated_at)
                .await?
                .iter()
                .map(|d| d.created_at)
                .max(),
        }) {
            return Ok(0);
        }

        let conditions = self.patients.list_active_conditions(patient.id).await?;
        let condition_names: Vec<String> =
            conditions.iter().map(|c| c.condition_name.clone()).collect();

        let documents = self.documents.list_for_patient(patient.id).await?;
        let today = ctx.clock.today();
        let now = ctx.clock.now();

        // §4.1.1 rule 4 / glossary "superseded": determine which base types are
        // superseded by an eligible, more-specific risk-based variant before
        // processing bases, so the base's screening row reflects supersession rather
        // than its own independent status.
        let mut superseded_bases: HashSet<Uuid> = HashSet::new();
        for st in active_types.iter().filter(|st| st.variant_of.is_some()) {
            if evaluate_eligibility(st, patient.sex, patient.age_in_years(today), &condition_names)
                .is_ok()
            {
                if let Some(base_id) = st.variant_of {
                    superseded_bases.insert(base_id);
                }
            }
        }

        let mut changed = 0usize;
        for st in &active_types {
            if superseded_bases.contains(&st.id) {
                match self
                    .supersede_base(ctx, patient, st, by_type.get(&st.id), now)
                    .await
                {
                    Ok(did_change) => changed += did_change as usize,
                    Err(err) => warn!(screening_type_id = %st.id, patient_id = %patient.id, error = %err, "failed to supersede base screening type"),
                }
                continue;
            }

            match self
                .process_screening_type(
                    ctx,
                    patient,
                    st,
                    &condition_names,
                    &documents,
                    by_type.get(&st.id),
                    today,
                    now,
                )
                .await
            {
                Ok(did_change) => changed += did_change as usize,
                // §4.1 "Failure semantics": per-type errors leave the prior screening
                // record unchanged and log a warning; the batch is not aborted.
                Err(err) => {
                    warn!(screening_type_id = %st.id, patient_id = %patient.id, error = %err, "screening type processing failed, leaving prior record unchanged");
                }
            }
        }

        let mut updated_patient = patient.clone();
        updated_patient.stamp_processed(now);
        self.patients.update(updated_patient).await?;

        Ok(changed)
    }

    /// §4.1 `RefreshAllInTenant(tenant) -> int`: iterates patients; per-patient errors
    /// are recorded and do not abort the batch.
    pub async fn refresh_all_in_tenant(&self, ctx: &Context, force: bool) -> AppResult<usize> {
        let scope = ctx.provider_scope();
        let patients = self.patients.list_for_scope(&scope).await?;
        let mut total = 0usize;
        for patient in &patients {
            match self.refresh_patient(ctx, patient, force).await {
                Ok(n) => total += n,
                Err(err) => {
                    warn!(patient_id = %patient.id, error = %err, "patient refresh failed, continuing batch");
                }
            }
        }
        Ok(total)
    }

    async fn process_screening_type(
        &self,
        ctx: &Context,
        patient: &Patient,
        st: &ScreeningType,
        condition_names: &[String],
        documents: &[shared::domain::entities::healthprep::PatientDocument],
        existing: Option<&Screening>,
        today: chrono::NaiveDate,
        now: chrono::DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut screening = existing
            .cloned()
            .unwrap_or_else(|| Screening::new(ctx.tenant_id(), patient.id, st.id));
        screening.provider_id = patient.provider_id;

        let eligibility =
            evaluate_eligibility(st, patient.sex, patient.age_in_years(today), condition_names);

        if eligibility.is_err() {
            // §4.1.1: "if not eligible, emit a Screening with status not_eligible
            // (preserving any prior last_completed)".
            screening.mark_not_eligible(now);
            self.persist(ctx, screening, existing).await?;
            return Ok(true);
        }

        if st.is_immunization_based {
            let outcome = self
                .immunizations
                .fetch(ctx.tenant_id(), patient, &st.cvx_codes)
                .await?;
            match evaluate_immunization(st, today, &outcome) {
                ImmunizationOutcome::RequiresVaccineCodes => {
                    screening.apply_unknown(true, now);
                }
                ImmunizationOutcome::Evidence(evidence) => {
                    screening.apply_evidence(
                        evidence.last_completed,
                        evidence.next_due,
                        today,
                        evidence.matched_document_ids,
                        now,
                    );
                }
            }
            self.persist(ctx, screening, existing).await?;
            return Ok(true);
        }

        let candidates = documents.iter().map(EvidenceCandidate::from);
        let evidence = evaluate_document_evidence(today, st.frequency, &st.keywords, candidates);
        screening.apply_evidence(
            evidence.last_completed,
            evidence.next_due,
            today,
            evidence.matched_document_ids,
            now,
        );
        self.persist(ctx, screening, existing).await?;
        Ok(true)
    }

    async fn supersede_base(
        &self,
        ctx: &Context,
        patient: &Patient,
        base_type: &ScreeningType,
        existing: Option<&Screening>,
        now: chrono::DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut screening = existing
            .cloned()
            .unwrap_or_else(|| Screening::new(ctx.tenant_id(), patient.id, base_type.id));
        screening.mark_superseded(now);
        self.persist(ctx, screening, existing).await?;
        Ok(true)
    }

    /// §4.1.6 "Association cleanup (scoped invalidation)": persist the screening and
    /// reconcile its document associations so a deleted/re-categorised document no
    /// longer "completes" it. The whole operation is treated as atomic per screening.
    async fn persist(
        &self,
        ctx: &Context,
        screening: Screening,
        existing: Option<&Screening>,
    ) -> AppResult<()> {
        let previous_matches: HashSet<Uuid> = existing
            .map(|s| s.matched_document_ids.iter().copied().collect())
            .unwrap_or_default();
        let new_matches: HashSet<Uuid> = screening.matched_document_ids.iter().copied().collect();

        let to_remove: Vec<Uuid> = previous_matches.difference(&new_matches).copied().collect();
        let to_add: Vec<Uuid> = new_matches.difference(&previous_matches).copied().collect();

        let saved = if existing.is_some() {
            self.screenings.update(screening).await?
        } else {
            self.screenings.create(screening).await?
        };

        if !to_remove.is_empty() {
            self.screenings.dissociate_documents(saved.id, &to_remove).await?;
        }
        for doc_id in to_add {
            self.screenings.associate_document(saved.id, doc_id).await?;
        }

        self.audit
            .record(AuditEntry::new(
                ctx.tenant_id(),
                Some(ctx.principal.user_id),
                AuditEventType::ScreeningUpdated,
                AuditResourceType::Screening,
                Some(saved.id),
                serde_json::json!({ "status": format!("{:?}", saved.status) }),
            ))
            .await?;

        Ok(())
    }
}
