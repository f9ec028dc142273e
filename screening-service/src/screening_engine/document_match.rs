//! §4.1.2 "Document-based completion" — cut-off window scanning, keyword evidencing,
//! and the `last_completed`/`next_due` calendar arithmetic.

use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use shared::domain::entities::healthprep::{Frequency, FrequencyUnit, PatientDocument};

use super::matcher::document_matches_any_keyword;

/// A document's id and date, narrowed from `PatientDocument`/`FHIRDocument` — §9 Design
/// Notes open question 2 treats both sources as one logical stream for matching.
#[derive(Debug, Clone, Copy)]
pub struct EvidenceCandidate<'a> {
    pub id: Uuid,
    pub date: NaiveDate,
    pub extracted_text: Option<&'a str>,
}

impl<'a> From<&'a PatientDocument> for EvidenceCandidate<'a> {
    fn from(doc: &'a PatientDocument) -> Self {
        Self {
            id: doc.id,
            date: doc.document_date,
            extracted_text: doc.extracted_text.as_deref(),
        }
    }
}

/// §4.1.2: "cut-off date = now - frequency window".
pub fn cutoff_date(today: NaiveDate, frequency: Frequency) -> NaiveDate {
    subtract_frequency(today, frequency)
}

fn subtract_frequency(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency.unit {
        FrequencyUnit::Days => date - chrono::Duration::days(frequency.value as i64),
        FrequencyUnit::Months => shift_months(date, -(frequency.value)),
        FrequencyUnit::Years => shift_months(date, -(frequency.value * 12)),
    }
}

/// §4.1.2: "next_due = last_completed + frequency (calendar arithmetic for
/// month/year units; exact days for day units)".
pub fn add_frequency(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency.unit {
        FrequencyUnit::Days => date + chrono::Duration::days(frequency.value as i64),
        FrequencyUnit::Months => shift_months(date, frequency.value),
        FrequencyUnit::Years => shift_months(date, frequency.value * 12),
    }
}

/// Calendar month arithmetic that clamps the day to the last valid day of the target
/// month (e.g. Jan 31 + 1 month = Feb 28/29), matching how clinical scheduling
/// software computes recurring due dates rather than chrono's "invalid date -> None".
fn shift_months(date: NaiveDate, delta_months: i32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + delta_months;
    let year = total.div_euclid(12);
    let month = (total.rem_euclid(12)) as u32 + 1;
    let last_day = days_in_month(year, month);
    NaiveDate::from_ymd_opt(year, month, date.day().min(last_day)).expect("valid clamped date")
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("valid date")
        .pred_opt()
        .expect("valid date")
        .day()
}

/// Outcome of scanning a patient's documents against one screening type's keyword set
/// and frequency window.
#[derive(Debug, Clone)]
pub struct DocumentEvidence {
    pub last_completed: Option<NaiveDate>,
    pub next_due: NaiveDate,
    pub matched_document_ids: Vec<Uuid>,
}

/// §4.1.2: scan documents dated on/after the cut-off, across both sources, keeping
/// every one whose extracted text evidences the screening (so the association list is
/// exhaustive, not just the most-recent match) while tracking the most recent date for
/// `last_completed`.
pub fn evaluate_document_evidence<'a>(
    today: NaiveDate,
    frequency: Frequency,
    keywords: &[String],
    documents: impl IntoIterator<Item = EvidenceCandidate<'a>>,
) -> DocumentEvidence {
    let cutoff = cutoff_date(today, frequency);
    let mut matched_document_ids = Vec::new();
    let mut most_recent: Option<NaiveDate> = None;

    for doc in documents {
        if doc.date < cutoff {
            continue;
        }
        let Some(text) = doc.extracted_text else {
            continue;
        };
        if !document_matches_any_keyword(text, keywords) {
            continue;
        }
        matched_document_ids.push(doc.id);
        most_recent = Some(most_recent.map_or(doc.date, |current| current.max(doc.date)));
    }

    match most_recent {
        Some(last_completed) => DocumentEvidence {
            last_completed: Some(last_completed),
            next_due: add_frequency(last_completed, frequency),
            matched_document_ids,
        },
        // §4.1.2: "if no evidencing document exists within window: status due,
        // next_due = today, last_completed = null".
        None => DocumentEvidence {
            last_completed: None,
            next_due: today,
            matched_document_ids: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn annual() -> Frequency {
        Frequency {
            value: 1,
            unit: FrequencyUnit::Years,
        }
    }

    #[test]
    fn s1_mammogram_document_sixty_days_ago_completes() {
        let today = date(2026, 7, 28);
        let doc_date = today - chrono::Duration::days(60);
        let docs = vec![EvidenceCandidate {
            id: Uuid::new_v4(),
            date: doc_date,
            extracted_text: Some("Mammography: bilateral screening, BI-RADS 1"),
        }];
        let evidence = evaluate_document_evidence(
            today,
            annual(),
            &["mammogram".to_string(), "mammography".to_string()],
            docs,
        );
        assert_eq!(evidence.last_completed, Some(doc_date));
        assert_eq!(evidence.next_due, today + chrono::Duration::days(305));
        assert_eq!(evidence.matched_document_ids.len(), 1);
    }

    #[test]
    fn no_evidencing_document_yields_due_today() {
        let today = date(2026, 7, 28);
        let evidence = evaluate_document_evidence(today, annual(), &["mammogram".to_string()], vec![]);
        assert_eq!(evidence.last_completed, None);
        assert_eq!(evidence.next_due, today);
        assert!(evidence.matched_document_ids.is_empty());
    }

    #[test]
    fn documents_before_cutoff_are_ignored() {
        let today = date(2026, 7, 28);
        let old_date = today - chrono::Duration::days(400);
        let docs = vec![EvidenceCandidate {
            id: Uuid::new_v4(),
            date: old_date,
            extracted_text: Some("mammogram done"),
        }];
        let evidence = evaluate_document_evidence(today, annual(), &["mammogram".to_string()], docs);
        assert!(evidence.last_completed.is_none());
    }

    #[test]
    fn monthly_frequency_uses_calendar_months() {
        let due = add_frequency(date(2026, 1, 31), Frequency { value: 1, unit: FrequencyUnit::Months });
        assert_eq!(due, date(2026, 2, 28));
    }

    #[test]
    fn day_frequency_is_exact() {
        let due = add_frequency(date(2026, 1, 1), Frequency { value: 10, unit: FrequencyUnit::Days });
        assert_eq!(due, date(2026, 1, 11));
    }
}
