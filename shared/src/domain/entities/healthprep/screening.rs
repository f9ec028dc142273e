use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "screening_status", rename_all = "snake_case")]
pub enum ScreeningStatus {
    Complete,
    DueSoon,
    Due,
    /// Reserved per §9 Design Notes open question 1: not produced by default. A
    /// tenant-configurable threshold past `next_due` would promote `Due` to this, but
    /// no such threshold exists yet — kept as a variant so the column and matcher
    /// already understand it the day one is added.
    Overdue,
    NotEligible,
    Superseded,
    Unknown,
}

/// §3 "Screening" — one record per (patient, screening_type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screening {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub patient_id: Uuid,
    pub screening_type_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub status: ScreeningStatus,
    pub last_completed: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
    pub is_dormant: bool,
    pub last_processed: Option<DateTime<Utc>>,
    /// Set explicitly (§4.1.5) when an immunization-based type has no CVX codes
    /// configured. `status` is `Unknown` in that case and the engine never guesses.
    pub requires_vaccine_codes: bool,
    /// Documents presently evidencing this screening (§4.1.6 "scoped invalidation").
    /// Persisted via an explicit junction table at the repository layer, held here as
    /// the in-memory view the engine reasons about.
    pub matched_document_ids: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: i64,
}

impl Screening {
    pub fn new(tenant_id: Uuid, patient_id: Uuid, screening_type_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            patient_id,
            screening_type_id,
            provider_id: None,
            status: ScreeningStatus::Unknown,
            last_completed: None,
            next_due: None,
            is_dormant: false,
            last_processed: None,
            requires_vaccine_codes: false,
            matched_document_ids: Vec::new(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// §4.1.1: not-eligible emission preserves any prior `last_completed`.
    pub fn mark_not_eligible(&mut self, processed_at: DateTime<Utc>) {
        self.status = ScreeningStatus::NotEligible;
        self.last_processed = Some(processed_at);
        self.updated_at = processed_at;
        self.version += 1;
    }

    pub fn mark_superseded(&mut self, processed_at: DateTime<Utc>) {
        self.status = ScreeningStatus::Superseded;
        self.last_processed = Some(processed_at);
        self.updated_at = processed_at;
        self.version += 1;
    }

    /// §4.1.2 status derivation from `today` vs `next_due`. Pure function so the
    /// engine and its tests can exercise the state table without a clock dependency.
    pub fn status_for(today: NaiveDate, next_due: NaiveDate) -> ScreeningStatus {
        let due_soon_start = next_due - chrono::Duration::days(30);
        if today < due_soon_start {
            ScreeningStatus::Complete
        } else if today < next_due {
            ScreeningStatus::DueSoon
        } else {
            ScreeningStatus::Due
        }
    }

    pub fn apply_evidence(
        &mut self,
        last_completed: Option<NaiveDate>,
        next_due: NaiveDate,
        today: NaiveDate,
        matched_document_ids: Vec<Uuid>,
        processed_at: DateTime<Utc>,
    ) {
        self.last_completed = last_completed;
        self.next_due = Some(next_due);
        self.status = if last_completed.is_some() {
            Self::status_for(today, next_due)
        } else {
            ScreeningStatus::Due
        };
        self.matched_document_ids = matched_document_ids;
        self.last_processed = Some(processed_at);
        self.updated_at = processed_at;
        self.version += 1;
    }

    pub fn apply_unknown(&mut self, requires_vaccine_codes: bool, processed_at: DateTime<Utc>) {
        self.status = ScreeningStatus::Unknown;
        self.requires_vaccine_codes = requires_vaccine_codes;
        self.last_processed = Some(processed_at);
        self.updated_at = processed_at;
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn s1_mammogram_becomes_complete() {
        // S1: document dated 60 days ago, annual frequency -> next_due = +305d from today.
        let today = date(2026, 7, 28);
        let last_completed = today - chrono::Duration::days(60);
        let next_due = last_completed + chrono::Months::new(12);
        assert_eq!(next_due, today + chrono::Duration::days(305));
        assert_eq!(
            Screening::status_for(today, next_due),
            ScreeningStatus::Complete
        );
    }

    #[test]
    fn due_soon_window_is_thirty_days() {
        let next_due = date(2026, 8, 1);
        assert_eq!(
            Screening::status_for(date(2026, 7, 2), next_due),
            ScreeningStatus::DueSoon
        );
        assert_eq!(
            Screening::status_for(date(2026, 7, 1), next_due),
            ScreeningStatus::Complete
        );
        assert_eq!(
            Screening::status_for(date(2026, 8, 1), next_due),
            ScreeningStatus::Due
        );
    }
}
