//! §4.1.5 "Immunization-based screenings".

use chrono::NaiveDate;

use shared::domain::entities::healthprep::ScreeningType;

use super::document_match::{add_frequency, DocumentEvidence};

/// A FHIR Immunization resource narrowed to what the engine needs: its CVX vaccine
/// code and administration date.
#[derive(Debug, Clone)]
pub struct ImmunizationRecord {
    pub cvx_code: String,
    pub administered_on: NaiveDate,
}

pub enum ImmunizationOutcome {
    /// §4.1.5: "if the type declares immunization-based but has no CVX codes
    /// configured, the status is unknown ... the engine never guesses." No FHIR
    /// Immunization query is made in this case (S3).
    RequiresVaccineCodes,
    Evidence(DocumentEvidence),
}

/// §4.1.5: find the most recent administration among the type's configured CVX codes
/// and feed it into the same status/next-due math as §4.1.2.
pub fn evaluate_immunization(
    screening_type: &ScreeningType,
    today: NaiveDate,
    immunizations: &[ImmunizationRecord],
) -> ImmunizationOutcome {
    if screening_type.requires_vaccine_codes() {
        return ImmunizationOutcome::RequiresVaccineCodes;
    }

    let most_recent = immunizations
        .iter()
        .filter(|imm| screening_type.cvx_codes.contains(&imm.cvx_code))
        .map(|imm| imm.administered_on)
        .max();

    match most_recent {
        Some(last_completed) => ImmunizationOutcome::Evidence(DocumentEvidence {
            last_completed: Some(last_completed),
            next_due: add_frequency(last_completed, screening_type.frequency),
            matched_document_ids: Vec::new(),
        }),
        None => ImmunizationOutcome::Evidence(DocumentEvidence {
            last_completed: None,
            next_due: today,
            matched_document_ids: Vec::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::entities::healthprep::{
        EligibleSexes, Frequency, FrequencyUnit, ScreeningCategory,
    };
    use uuid::Uuid;

    fn flu_shot(cvx_codes: Vec<String>) -> ScreeningType {
        let mut st = ScreeningType::new(
            Some(Uuid::new_v4()),
            "Annual Influenza".into(),
            EligibleSexes::Both,
            Frequency { value: 1, unit: FrequencyUnit::Years },
            ScreeningCategory::General,
        );
        st.is_immunization_based = true;
        st.cvx_codes = cvx_codes;
        st
    }

    #[test]
    fn s3_immunization_based_with_no_codes_requires_vaccine_codes() {
        let st = flu_shot(vec![]);
        let today = NaiveDate::from_ymd_opt(2026, 7, 28).unwrap();
        assert!(matches!(
            evaluate_immunization(&st, today, &[]),
            ImmunizationOutcome::RequiresVaccineCodes
        ));
    }

    #[test]
    fn matches_only_configured_cvx_codes() {
        let st = flu_shot(vec!["88".to_string()]);
        let today = NaiveDate::from_ymd_opt(2026, 7, 28).unwrap();
        let records = vec![
            ImmunizationRecord { cvx_code: "08".into(), administered_on: today - chrono::Duration::days(10) },
            ImmunizationRecord { cvx_code: "88".into(), administered_on: today - chrono::Duration::days(30) },
        ];
        match evaluate_immunization(&st, today, &records) {
            ImmunizationOutcome::Evidence(ev) => {
                assert_eq!(ev.last_completed, Some(today - chrono::Duration::days(30)));
            }
            _ => panic!("expected evidence"),
        }
    }
}
