use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::AuditFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "patient_sex", rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
    Unknown,
}

/// §3 "Patient". Deliberately slimmer than a full clinical record — HealthPrep only
/// needs the demographic surface the screening engine evaluates eligibility against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Owning clinician. §3 invariant: a patient with `Some(provider_id)` belongs to
    /// exactly one provider's roster within its tenant.
    pub provider_id: Option<Uuid>,
    pub mrn: String,
    pub epic_patient_id: Option<String>,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub last_fhir_sync: Option<DateTime<Utc>>,
    /// §4.1.4 selective-refresh anchor: stamped only when a refresh actually processes
    /// this patient, never on a skip.
    pub documents_last_evaluated_at: Option<DateTime<Utc>>,

    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub system_id: Option<String>,
    pub version: i64,
}

impl Patient {
    pub fn new(
        tenant_id: Uuid,
        mrn: String,
        name: String,
        date_of_birth: NaiveDate,
        sex: Sex,
    ) -> Self {
        let audit = AuditFields::new();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            provider_id: None,
            mrn,
            epic_patient_id: None,
            name,
            date_of_birth,
            sex,
            last_fhir_sync: None,
            documents_last_evaluated_at: None,
            request_id: audit.request_id,
            created_at: audit.created_at,
            updated_at: audit.updated_at,
            created_by: audit.created_by,
            updated_by: audit.updated_by,
            system_id: audit.system_id,
            version: audit.version,
        }
    }

    /// Age in whole years as of `as_of`, per §4.1.1 rule 2.
    pub fn age_in_years(&self, as_of: NaiveDate) -> i32 {
        let mut age = as_of.year() - self.date_of_birth.year();
        let birthday_this_year = NaiveDate::from_ymd_opt(
            as_of.year(),
            self.date_of_birth.month(),
            self.date_of_birth.day(),
        );
        if let Some(birthday) = birthday_this_year {
            if as_of < birthday {
                age -= 1;
            }
        }
        age
    }

    /// §4.1.4 rule 2/3: selective refresh requires both timestamps present and at least
    /// one prior screening record (checked separately by the caller against the
    /// screening repository, since that is a cross-entity fact this struct can't hold).
    pub fn has_prior_sync_timestamps(&self) -> bool {
        self.last_fhir_sync.is_some() && self.documents_last_evaluated_at.is_some()
    }

    pub fn stamp_processed(&mut self, processed_at: DateTime<Utc>) {
        self.last_fhir_sync = Some(processed_at);
        self.documents_last_evaluated_at = Some(processed_at);
        self.updated_at = processed_at;
        self.version += 1;
    }
}

/// §3 "PatientCondition".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCondition {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub tenant_id: Uuid,
    pub condition_name: String,
    pub icd10_code: Option<String>,
    pub active: bool,
    pub onset_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientCondition {
    pub fn new(tenant_id: Uuid, patient_id: Uuid, condition_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            patient_id,
            tenant_id,
            condition_name,
            icd10_code: None,
            active: true,
            onset_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_born(year: i32, month: u32, day: u32) -> Patient {
        Patient::new(
            Uuid::new_v4(),
            "MRN-1".into(),
            "Test Patient".into(),
            NaiveDate::from_ymd_opt(year, month, day).unwrap(),
            Sex::Female,
        )
    }

    #[test]
    fn age_before_birthday_this_year_is_one_less() {
        let patient = patient_born(1970, 6, 15);
        let as_of = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
        assert_eq!(patient.age_in_years(as_of), 55);
    }

    #[test]
    fn age_on_birthday_counts_the_year() {
        let patient = patient_born(1970, 6, 15);
        let as_of = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        assert_eq!(patient.age_in_years(as_of), 56);
    }
}
