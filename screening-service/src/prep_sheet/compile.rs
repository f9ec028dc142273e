//! §4.6 "compile": demographics (safe fields only), screenings grouped by status,
//! recent documents within per-category cut-offs, upcoming appointments.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use shared::domain::entities::healthprep::{Patient, Screening, ScreeningStatus, Sex};
use shared::domain::repositories::healthprep::{
    AppointmentRepository, DocumentRepository, ScreeningRepository, ScreeningTypeRepository,
};
use shared::shared::AppResult;

use crate::context::Context;
use crate::phi_filter::prep_sheet_category;

/// §4.6: "demographics (safe fields only)" — everything here already lives on
/// `Patient` itself, so there's no free-text EMR field to accidentally surface.
#[derive(Debug, Clone, Serialize)]
pub struct PrepSheetDemographics {
    pub name: String,
    pub mrn: String,
    pub date_of_birth: NaiveDate,
    pub age_years: i32,
    pub sex: Sex,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreeningLine {
    pub screening_type_id: Uuid,
    pub screening_type_name: String,
    pub status: ScreeningStatus,
    pub last_completed: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentLine {
    pub safe_title: String,
    pub document_date: NaiveDate,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppointmentLine {
    pub scheduled_at: chrono::DateTime<chrono::Utc>,
    pub appointment_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrepSheetData {
    pub patient_id: Uuid,
    pub demographics: PrepSheetDemographics,
    pub screenings_by_status: Vec<(ScreeningStatus, Vec<ScreeningLine>)>,
    pub recent_documents: Vec<DocumentLine>,
    pub upcoming_appointments: Vec<AppointmentLine>,
}

impl PrepSheetData {
    /// §4.6 write-back title: "a compact screening summary" — the only PHI-free
    /// content allowed alongside the timestamp, so this deliberately emits counts
    /// per status rather than names.
    pub fn compact_summary(&self) -> String {
        if self.screenings_by_status.is_empty() {
            return "no active screenings".to_string();
        }
        self.screenings_by_status
            .iter()
            .map(|(status, lines)| format!("{} {}", lines.len(), status_label(*status)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn status_label(status: ScreeningStatus) -> &'static str {
    match status {
        ScreeningStatus::Complete => "complete",
        ScreeningStatus::DueSoon => "due soon",
        ScreeningStatus::Due => "due",
        ScreeningStatus::Overdue => "overdue",
        ScreeningStatus::NotEligible => "not eligible",
        ScreeningStatus::Superseded => "superseded",
        ScreeningStatus::Unknown => "unknown",
    }
}

/// Presentation order: actionable statuses first, provenance-only ones last.
const STATUS_ORDER: &[ScreeningStatus] = &[
    ScreeningStatus::Overdue,
    ScreeningStatus::Due,
    ScreeningStatus::DueSoon,
    ScreeningStatus::Unknown,
    ScreeningStatus::NotEligible,
    ScreeningStatus::Complete,
];

pub struct PrepSheetCompiler {
    screenings: Arc<dyn ScreeningRepository>,
    screening_types: Arc<dyn ScreeningTypeRepository>,
    documents: Arc<dyn DocumentRepository>,
    appointments: Arc<dyn AppointmentRepository>,
}

impl PrepSheetCompiler {
    pub fn new(
        screenings: Arc<dyn ScreeningRepository>,
        screening_types: Arc<dyn ScreeningTypeRepository>,
        documents: Arc<dyn DocumentRepository>,
        appointments: Arc<dyn AppointmentRepository>,
    ) -> Self {
        Self {
            screenings,
            screening_types,
            documents,
            appointments,
        }
    }

    pub async fn compile(&self, ctx: &Context, patient: &Patient) -> AppResult<PrepSheetData> {
        self.compile_filtered(ctx, patient, None).await
    }

    /// Same as `compile`, restricted to the given screening types when `Some` (the
    /// `EnqueuePrepSheets(tenant, patient_ids, screening_type_ids)` operation, §6).
    pub async fn compile_filtered(
        &self,
        ctx: &Context,
        patient: &Patient,
        screening_type_ids: Option<&[Uuid]>,
    ) -> AppResult<PrepSheetData> {
        let today = ctx.clock.today();

        let demographics = PrepSheetDemographics {
            name: patient.name.clone(),
            mrn: patient.mrn.clone(),
            date_of_birth: patient.date_of_birth,
            age_years: patient.age_in_years(today),
            sex: patient.sex,
        };

        let screenings_by_status = self.group_screenings(patient.id, screening_type_ids).await?;
        let recent_documents = self.recent_documents(ctx, patient.id, today).await?;
        let upcoming_appointments = self.upcoming_appointments(ctx, patient.id, today).await?;

        Ok(PrepSheetData {
            patient_id: patient.id,
            demographics,
            screenings_by_status,
            recent_documents,
            upcoming_appointments,
        })
    }

    /// §4.7 supplement: a prep sheet, like the default screening listing, has no use
    /// for `superseded` rows — they're provenance, not a patient's current state.
    async fn group_screenings(
        &self,
        patient_id: Uuid,
        screening_type_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<(ScreeningStatus, Vec<ScreeningLine>)>> {
        let screenings: Vec<Screening> = self
            .screenings
            .list_for_patient(patient_id)
            .await?
            .into_iter()
            .filter(|s| s.status != ScreeningStatus::Superseded)
            .filter(|s| {
                screening_type_ids
                    .map(|ids| ids.contains(&s.screening_type_id))
                    .unwrap_or(true)
            })
            .collect();

        let mut names: std::collections::HashMap<Uuid, String> = std::collections::HashMap::new();
        for screening in &screenings {
            if names.contains_key(&screening.screening_type_id) {
                continue;
            }
            if let Some(screening_type) = self.screening_types.find_by_id(screening.screening_type_id).await? {
                names.insert(screening.screening_type_id, screening_type.name);
            }
        }

        let mut grouped: Vec<(ScreeningStatus, Vec<ScreeningLine>)> =
            STATUS_ORDER.iter().map(|s| (*s, Vec::new())).collect();
        for screening in screenings {
            let screening_type_name = names
                .get(&screening.screening_type_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Screening".to_string());
            let line = ScreeningLine {
                screening_type_id: screening.screening_type_id,
                screening_type_name,
                status: screening.status,
                last_completed: screening.last_completed,
                next_due: screening.next_due,
            };
            if let Some(bucket) = grouped.iter_mut().find(|(status, _)| *status == screening.status) {
                bucket.1.push(line);
            }
        }
        grouped.retain(|(_, lines)| !lines.is_empty());
        Ok(grouped)
    }

    async fn recent_documents(
        &self,
        ctx: &Context,
        patient_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Vec<DocumentLine>> {
        let cutoffs = ctx.tenant.document_cutoffs;
        let mut lines = Vec::new();
        for document in self.documents.list_for_patient(patient_id).await? {
            let Some(category) = prep_sheet_category(document.loinc_code.as_deref()) else {
                continue;
            };
            let cutoff_months = match category {
                "lab" => cutoffs.lab_cutoff_months,
                "imaging" => cutoffs.imaging_cutoff_months,
                "consult" => cutoffs.consult_cutoff_months,
                "hospital" => cutoffs.hospital_cutoff_months,
                _ => continue,
            };
            let Some(cutoff_date) = today.checked_sub_months(Months::new(cutoff_months.max(0) as u32)) else {
                continue;
            };
            if document.document_date >= cutoff_date {
                lines.push(DocumentLine {
                    safe_title: document.safe_title,
                    document_date: document.document_date,
                    category,
                });
            }
        }
        lines.sort_by(|a, b| b.document_date.cmp(&a.document_date));
        Ok(lines)
    }

    async fn upcoming_appointments(
        &self,
        ctx: &Context,
        patient_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Vec<AppointmentLine>> {
        let window_end = today + chrono::Duration::days(ctx.tenant.caps.prioritization_window_days as i64);
        let mut lines: Vec<AppointmentLine> = self
            .appointments
            .list_for_patient(patient_id)
            .await?
            .into_iter()
            .filter(|appointment| {
                appointment.is_upcoming_and_actionable()
                    && appointment.scheduled_at.date_naive() >= today
                    && appointment.scheduled_at.date_naive() <= window_end
            })
            .map(|appointment| AppointmentLine {
                scheduled_at: appointment.scheduled_at,
                appointment_type: appointment.appointment_type,
            })
            .collect();
        lines.sort_by_key(|line| line.scheduled_at);
        Ok(lines)
    }
}
