//! §4.1.1 "Eligibility" — the four-rule gate a patient must clear for a screening type.

use chrono::NaiveDate;

use shared::domain::entities::healthprep::{
    EligibleSexes, ScreeningCategory, ScreeningType, Sex,
};

use super::matcher::any_trigger_matches;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IneligibleReason {
    SexMismatch,
    OutsideAgeRange,
    /// §4.1.1 rule 3: conditional type with no matching trigger condition.
    NoTriggerCondition,
    /// §4.1.1 rule 4: risk-based variant whose conditions don't match; the base type
    /// remains in play and this variant is skipped rather than evaluated.
    VariantConditionsNotMet,
}

pub type EligibilityResult = Result<(), IneligibleReason>;

fn sex_matches(eligible: EligibleSexes, patient_sex: Sex) -> bool {
    match eligible {
        EligibleSexes::Both => true,
        EligibleSexes::Male => matches!(patient_sex, Sex::Male),
        EligibleSexes::Female => matches!(patient_sex, Sex::Female),
    }
}

fn age_in_range(age: i32, min_age: Option<i32>, max_age: Option<i32>) -> bool {
    min_age.map(|min| age >= min).unwrap_or(true) && max_age.map(|max| age <= max).unwrap_or(true)
}

/// §4.1.1: evaluate all four rules for a patient against one screening type.
///
/// `patient_active_condition_names` are the patient's active `PatientCondition` names;
/// rule 3/4 fuzzy-match these against the type's `trigger_conditions`.
pub fn evaluate_eligibility(
    screening_type: &ScreeningType,
    patient_sex: Sex,
    patient_age: i32,
    patient_active_condition_names: &[String],
) -> EligibilityResult {
    if !sex_matches(screening_type.eligible_sexes, patient_sex) {
        return Err(IneligibleReason::SexMismatch);
    }

    if !age_in_range(patient_age, screening_type.min_age, screening_type.max_age) {
        return Err(IneligibleReason::OutsideAgeRange);
    }

    match screening_type.screening_category {
        ScreeningCategory::Conditional => {
            if !any_trigger_matches(
                &screening_type.trigger_conditions,
                patient_active_condition_names,
            ) {
                return Err(IneligibleReason::NoTriggerCondition);
            }
        }
        ScreeningCategory::RiskBased => {
            if screening_type.variant_of.is_some()
                && !any_trigger_matches(
                    &screening_type.trigger_conditions,
                    patient_active_condition_names,
                )
            {
                return Err(IneligibleReason::VariantConditionsNotMet);
            }
        }
        ScreeningCategory::General => {}
    }

    Ok(())
}

/// Whole-years age as of `as_of` (§4.1.1 rule 2). Thin wrapper kept here so callers of
/// this module don't need to import `Patient` just to compute eligibility inputs; the
/// canonical implementation lives on `Patient::age_in_years`.
pub fn age_in_years(date_of_birth: NaiveDate, as_of: NaiveDate) -> i32 {
    use chrono::Datelike;
    let mut age = as_of.year() - date_of_birth.year();
    if let Some(birthday) = NaiveDate::from_ymd_opt(as_of.year(), date_of_birth.month(), date_of_birth.day()) {
        if as_of < birthday {
            age -= 1;
        }
    }
    age
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::entities::healthprep::{Frequency, FrequencyUnit};
    use uuid::Uuid;

    fn mammogram() -> ScreeningType {
        let mut st = ScreeningType::new(
            Some(Uuid::new_v4()),
            "Mammogram".into(),
            EligibleSexes::Female,
            Frequency {
                value: 1,
                unit: FrequencyUnit::Years,
            },
            ScreeningCategory::General,
        );
        st.min_age = Some(40);
        st.max_age = Some(75);
        st.keywords = vec!["mammogram".into(), "mammography".into()];
        st
    }

    #[test]
    fn s1_eligible_female_age_55() {
        assert_eq!(evaluate_eligibility(&mammogram(), Sex::Female, 55, &[]), Ok(()));
    }

    #[test]
    fn male_patient_is_ineligible() {
        assert_eq!(
            evaluate_eligibility(&mammogram(), Sex::Male, 55, &[]),
            Err(IneligibleReason::SexMismatch)
        );
    }

    #[test]
    fn s2_raising_min_age_makes_a_55_year_old_ineligible() {
        let mut st = mammogram();
        st.min_age = Some(60);
        assert_eq!(
            evaluate_eligibility(&st, Sex::Female, 55, &[]),
            Err(IneligibleReason::OutsideAgeRange)
        );
    }

    #[test]
    fn conditional_type_requires_trigger_condition_match() {
        let mut st = mammogram();
        st.screening_category = ScreeningCategory::Conditional;
        st.trigger_conditions = vec!["BRCA mutation".into()];
        assert_eq!(
            evaluate_eligibility(&st, Sex::Female, 45, &[]),
            Err(IneligibleReason::NoTriggerCondition)
        );
        assert_eq!(
            evaluate_eligibility(&st, Sex::Female, 45, &["BRCA mutation".to_string()]),
            Ok(())
        );
    }

    #[test]
    fn age_in_years_handles_leap_birthdays() {
        assert_eq!(
            age_in_years(
                NaiveDate::from_ymd_opt(2000, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
            ),
            25
        );
    }
}
