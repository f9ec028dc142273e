//! §4.4 "Safe titles": derived ONLY from structured codes via a closed lookup table.
//! Free-text `description`/`title` fields from the EMR are never consulted here —
//! this module's function signatures don't even accept a free-text parameter, so the
//! invariant is enforced by the type signature rather than by caller discipline.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// LOINC document-type code -> PHI-free display name (§4.4, §8 property 6). A
/// representative slice of the source vocabulary's ~150 entries; codes outside this
/// table fall through to the category-code lookup, then to a generic label.
static LOINC_DOCUMENT_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("11488-4", "Consultation Note"),
        ("11502-2", "Laboratory Report"),
        ("11503-0", "Medical Records"),
        ("11504-8", "Surgical Operation Note"),
        ("11505-5", "Procedure Note"),
        ("11506-3", "Progress Note"),
        ("18842-5", "Discharge Summary"),
        ("18841-7", "Hospital Consultations"),
        ("18748-4", "Diagnostic Imaging Study"),
        ("18782-3", "Radiology Study"),
        ("28579-1", "Discharge Summary"),
        ("29752-3", "Perioperative Record"),
        ("34099-2", "Cardiology Consult Note"),
        ("34105-7", "Hospital Discharge Summary"),
        ("34111-5", "Emergency Department Note"),
        ("34112-3", "Hospital Admission Note"),
        ("34117-2", "History and Physical Note"),
        ("34785-6", "Radiology Note"),
        ("47039-3", "Admission Note"),
        ("47519-4", "Diagnostic Imaging Report"),
        ("51845-6", "Outpatient Consultation Note"),
        ("51846-4", "Emergency Department Note"),
        ("57133-1", "Referral Note"),
        ("59282-4", "Stress Test Report"),
        ("60567-5", "Comprehensive Pathology Report"),
        ("68624-6", "Hospitalization Summary"),
        ("69730-0", "Instructions"),
        ("74156-1", "Treatment Plan"),
        ("83909-3", "EKG/ECG Report"),
        ("85898-7", "Screening Form"),
    ])
});

/// FHIR `DocumentReference.category` coding code -> PHI-free display name, a coarser
/// fallback when no type-coding match exists.
static CATEGORY_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("clinical-note", "Clinical Note"),
        ("imaging", "Imaging Report"),
        ("laboratory", "Laboratory Report"),
        ("pathology", "Pathology Report"),
        ("procedure-note", "Procedure Note"),
        ("discharge-summary", "Discharge Summary"),
        ("referral", "Referral"),
        ("administrative", "Administrative Document"),
        ("consent", "Consent Form"),
        ("other", "Document"),
    ])
});

/// §4.6 per-category cut-off bucket a document's LOINC code maps to.
static LOINC_TO_PREP_SHEET_CATEGORY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let groups: &[(&str, &[&str])] = &[
        (
            "lab",
            &[
                "11502-2", "26436-6", "26438-2", "26439-0", "26440-8", "26441-6", "26442-4",
                "26443-2", "26444-0", "26445-7", "27898-6", "60567-5", "34776-5",
            ],
        ),
        (
            "imaging",
            &[
                "18748-4", "18782-3", "47519-4", "34785-6", "57147-1", "70004-7", "87273-1",
                "83909-3", "59282-4", "58477-1",
            ],
        ),
        (
            "consult",
            &[
                "11488-4", "18841-7", "28569-2", "51845-6", "57133-1", "34099-2", "34752-6",
                "34758-3", "34759-1", "34763-3", "34765-8", "34766-6", "34771-6", "34783-1",
                "34788-0",
            ],
        ),
        (
            "hospital",
            &[
                "18842-5", "28579-1", "34105-7", "34106-5", "34112-3", "68624-6", "11506-3",
                "28568-4", "34746-8", "34100-8", "29751-5", "47039-3", "34136-2", "28582-5",
                "68613-9", "34745-0", "34111-5", "51846-4", "59258-4", "60280-5",
            ],
        ),
    ];
    let mut map = HashMap::new();
    for (category, codes) in groups {
        for code in *codes {
            map.insert(*code, *category);
        }
    }
    map
});

/// A document's type coding narrowed to code + coding-system URI, and its category
/// coding codes — everything `safe_title`/`prep_sheet_category` need, with no room
/// for a free-text field to sneak in.
#[derive(Debug, Clone, Default)]
pub struct StructuredCoding<'a> {
    pub type_code: Option<&'a str>,
    pub category_codes: &'a [&'a str],
}

/// §4.4 `get_safe_document_type`: type coding first, then category, then a generic
/// fallback that still surfaces the raw code rather than silently dropping it.
pub fn safe_title(coding: &StructuredCoding<'_>) -> String {
    if let Some(code) = coding.type_code {
        if let Some(name) = LOINC_DOCUMENT_TYPES.get(code) {
            return (*name).to_string();
        }
    }
    for code in coding.category_codes {
        if let Some(name) = CATEGORY_CODES.get(code) {
            return (*name).to_string();
        }
    }
    match coding.type_code {
        Some(code) => format!("Document ({code})"),
        None => "Document".to_string(),
    }
}

/// §4.6: map a LOINC code to its prep-sheet cut-off bucket. Unknown codes have no
/// bucket and are excluded from the recent-documents section entirely, rather than
/// guessed into one.
pub fn prep_sheet_category(loinc_code: Option<&str>) -> Option<&'static str> {
    loinc_code.and_then(|code| LOINC_TO_PREP_SHEET_CATEGORY.get(code).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_loinc_code_yields_safe_name() {
        let coding = StructuredCoding { type_code: Some("11506-3"), category_codes: &[] };
        assert_eq!(safe_title(&coding), "Progress Note");
    }

    #[test]
    fn falls_back_to_category_when_type_unknown() {
        let coding = StructuredCoding { type_code: Some("99999-9"), category_codes: &["imaging"] };
        assert_eq!(safe_title(&coding), "Imaging Report");
    }

    #[test]
    fn unknown_code_and_category_falls_back_to_generic_with_code() {
        let coding = StructuredCoding { type_code: Some("99999-9"), category_codes: &[] };
        assert_eq!(safe_title(&coding), "Document (99999-9)");
    }

    #[test]
    fn no_coding_at_all_is_plain_document() {
        let coding = StructuredCoding::default();
        assert_eq!(safe_title(&coding), "Document");
    }

    #[test]
    fn prep_sheet_category_buckets_known_lab_code() {
        assert_eq!(prep_sheet_category(Some("11502-2")), Some("lab"));
    }

    #[test]
    fn prep_sheet_category_is_none_for_unmapped_code() {
        assert_eq!(prep_sheet_category(Some("00000-0")), None);
    }
}
