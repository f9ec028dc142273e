//! §4.4 "PHI filter — deterministic rules": a fixed regex library, with a per-tenant
//! toggle set (`PhiFilterSettings`) selecting which members run.

use once_cell::sync::Lazy;
use regex::Regex;

use shared::domain::entities::healthprep::PhiFilterSettings;

/// One library entry: the pattern, its replacement token, and the toggle that gates it.
struct Rule {
    pattern: &'static Lazy<Regex>,
    token: &'static str,
    enabled: fn(&PhiFilterSettings) -> bool,
}

static SSN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap());
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap());
static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());
static ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d{1,5}\s+[\w\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Court|Ct|Way|Place|Pl)\.?\b",
    )
    .unwrap()
});
static MRN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bMRN[-:\s]?\d{5,10}\b").unwrap());
static DATE_OF_BIRTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/(?:19|20)\d{2}\b").unwrap());
static NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bDr\.?\s+[A-Z][a-z]+\s+[A-Z][a-z]+\b").unwrap());

static RULES: &[Rule] = &[
    Rule { pattern: &SSN, token: "[SSN_REDACTED]", enabled: |s| s.filter_ssn },
    Rule { pattern: &PHONE, token: "[PHONE_REDACTED]", enabled: |s| s.filter_phone },
    Rule { pattern: &EMAIL, token: "[EMAIL_REDACTED]", enabled: |s| s.filter_phone },
    Rule { pattern: &ADDRESS, token: "[ADDRESS_REDACTED]", enabled: |s| s.filter_addresses },
    Rule { pattern: &MRN, token: "[MRN_REDACTED]", enabled: |s| s.filter_mrn },
    Rule { pattern: &DATE_OF_BIRTH, token: "[DATE_REDACTED]", enabled: |s| s.filter_dates },
    Rule { pattern: &NAME, token: "[PRACTITIONER_REDACTED]", enabled: |s| s.filter_names },
];

/// Counts per redaction token, so the audit layer can record *what kind* of PHI was
/// found without recording the PHI itself (§4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionCounts(pub std::collections::BTreeMap<&'static str, usize>);

#[derive(Debug, Clone)]
pub struct RedactionResult {
    pub text: String,
    pub counts: RedactionCounts,
}

/// Runs every enabled rule against `text` in a fixed order, replacing each span with
/// its typed token.
pub fn redact(text: &str, settings: &PhiFilterSettings) -> RedactionResult {
    let mut current = text.to_string();
    let mut counts = RedactionCounts::default();

    for rule in RULES {
        if !(rule.enabled)(settings) {
            continue;
        }
        let mut hits = 0usize;
        let replaced = rule.pattern.replace_all(&current, |_: &regex::Captures| {
            hits += 1;
            rule.token
        });
        if hits > 0 {
            current = replaced.into_owned();
            *counts.0.entry(rule.token).or_insert(0) += hits;
        }
    }

    RedactionResult { text: current, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_ssn_and_email_by_default() {
        let settings = PhiFilterSettings::default();
        let result = redact("SSN 123-45-6789, contact jane.doe@example.com", &settings);
        assert!(result.text.contains("[SSN_REDACTED]"));
        assert!(result.text.contains("[EMAIL_REDACTED]"));
        assert_eq!(result.counts.0.get("[SSN_REDACTED]"), Some(&1));
    }

    #[test]
    fn dates_are_not_redacted_by_default() {
        let settings = PhiFilterSettings::default();
        let result = redact("DOB 04/12/1970", &settings);
        assert!(result.text.contains("04/12/1970"));
        assert!(result.counts.0.is_empty());
    }

    #[test]
    fn toggling_off_a_rule_leaves_the_span_untouched() {
        let mut settings = PhiFilterSettings::default();
        settings.filter_ssn = false;
        let result = redact("SSN 123-45-6789", &settings);
        assert!(result.text.contains("123-45-6789"));
    }

    #[test]
    fn enabling_filter_dates_redacts_birthdate() {
        let mut settings = PhiFilterSettings::default();
        settings.filter_dates = true;
        let result = redact("DOB 04/12/1970", &settings);
        assert!(result.text.contains("[DATE_REDACTED]"));
    }
}
