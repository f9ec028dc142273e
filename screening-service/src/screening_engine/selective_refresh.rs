//! §4.1.4 "Selective refresh (deterministic)" — the skip decision and its bookkeeping.
//! §8 properties 1 and 2 (soundness/liveness) are anchored entirely in this module.

use chrono::{DateTime, Utc};

use shared::domain::entities::healthprep::{Patient, ScreeningType};

/// Inputs needed to decide whether a patient may be skipped on this refresh pass.
pub struct SkipCheck<'a> {
    pub patient: &'a Patient,
    pub force: bool,
    /// At least one screening record already exists for this patient.
    pub has_prior_screening: bool,
    pub active_screening_types: &'a [ScreeningType],
    /// Latest `created_at` among the patient's Document and FHIRDocument rows, if any.
    pub latest_document_created_at: Option<DateTime<Utc>>,
}

/// §4.1.4: a patient may be skipped iff ALL five conditions hold. Returns `true` when
/// the patient should be **skipped**.
pub fn may_skip(check: &SkipCheck<'_>) -> bool {
    if check.force {
        return false;
    }
    if !check.patient.has_prior_sync_timestamps() {
        return false;
    }
    if !check.has_prior_screening {
        return false;
    }

    // documents_last_evaluated_at is guaranteed Some by has_prior_sync_timestamps above.
    let evaluated_at = check
        .patient
        .documents_last_evaluated_at
        .expect("checked by has_prior_sync_timestamps");

    let all_criteria_stable = check
        .active_screening_types
        .iter()
        .all(|st| st.criteria_last_changed_at <= evaluated_at);
    if !all_criteria_stable {
        return false;
    }

    if let Some(latest_doc) = check.latest_document_created_at {
        if latest_doc > evaluated_at {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::domain::entities::healthprep::{
        EligibleSexes, Frequency, FrequencyUnit, ScreeningCategory, Sex,
    };
    use uuid::Uuid;

    fn patient_with_timestamps(processed_at: DateTime<Utc>) -> Patient {
        let mut p = Patient::new(
            Uuid::new_v4(),
            "MRN-1".into(),
            "Test".into(),
            chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            Sex::Female,
        );
        p.stamp_processed(processed_at);
        p
    }

    fn screening_type_changed_at(changed_at: DateTime<Utc>) -> ScreeningType {
        let mut st = ScreeningType::new(
            Some(Uuid::new_v4()),
            "Mammogram".into(),
            EligibleSexes::Female,
            Frequency { value: 1, unit: FrequencyUnit::Years },
            ScreeningCategory::General,
        );
        st.criteria_last_changed_at = changed_at;
        st
    }

    #[test]
    fn force_always_disables_skip() {
        let now = Utc::now();
        let patient = patient_with_timestamps(now);
        let check = SkipCheck {
            patient: &patient,
            force: true,
            has_prior_screening: true,
            active_screening_types: &[],
            latest_document_created_at: None,
        };
        assert!(!may_skip(&check));
    }

    #[test]
    fn first_ever_sync_is_never_skippable() {
        let patient = Patient::new(
            Uuid::new_v4(),
            "MRN-1".into(),
            "Test".into(),
            chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            Sex::Female,
        );
        let check = SkipCheck {
            patient: &patient,
            force: false,
            has_prior_screening: false,
            active_screening_types: &[],
            latest_document_created_at: None,
        };
        assert!(!may_skip(&check));
    }

    #[test]
    fn stable_criteria_and_no_new_documents_is_skippable() {
        let now = Utc::now();
        let patient = patient_with_timestamps(now);
        let st = screening_type_changed_at(now - Duration::days(10));
        let check = SkipCheck {
            patient: &patient,
            force: false,
            has_prior_screening: true,
            active_screening_types: std::slice::from_ref(&st),
            latest_document_created_at: Some(now - Duration::days(5)),
        };
        assert!(may_skip(&check));
    }

    #[test]
    fn s2_criteria_signature_change_forces_reprocess() {
        let now = Utc::now();
        let patient = patient_with_timestamps(now - Duration::days(1));
        // Admin edited the type after the patient's last evaluation.
        let st = screening_type_changed_at(now);
        let check = SkipCheck {
            patient: &patient,
            force: false,
            has_prior_screening: true,
            active_screening_types: std::slice::from_ref(&st),
            latest_document_created_at: None,
        };
        assert!(!may_skip(&check));
    }

    #[test]
    fn new_document_since_last_evaluation_forces_reprocess() {
        let now = Utc::now();
        let patient = patient_with_timestamps(now - Duration::days(2));
        let st = screening_type_changed_at(now - Duration::days(30));
        let check = SkipCheck {
            patient: &patient,
            force: false,
            has_prior_screening: true,
            active_screening_types: std::slice::from_ref(&st),
            latest_document_created_at: Some(now - Duration::days(1)),
        };
        assert!(!may_skip(&check));
    }
}
