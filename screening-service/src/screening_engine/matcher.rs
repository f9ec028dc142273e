//! §4.1.3 "Keyword & fuzzy matching" — label normalisation, the abbreviation table, and
//! the two similarity measures the engine takes the max of.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// §4.1.3 / SPEC_FULL "Label normalization abbreviation table": the source's
/// `LabelNormalizer` expansion table, reproduced verbatim.
static ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("dxa", "dexa"),
        ("dexascan", "dexa"),
        ("ekg", "ecg"),
        ("cxr", "chest x-ray"),
        ("ct", "computed tomography"),
        ("mri", "magnetic resonance imaging"),
        ("cbc", "complete blood count"),
        ("bmp", "basic metabolic panel"),
        ("cmp", "comprehensive metabolic panel"),
        ("lft", "liver function test"),
        ("tsh", "thyroid stimulating hormone"),
        ("psa", "prostate specific antigen"),
        ("hgb", "hemoglobin"),
        ("hct", "hematocrit"),
        ("bp", "blood pressure"),
    ])
});

/// Stopwords stripped during normalisation unless the token is itself an abbreviation
/// expansion (§4.1.3: "stopwords are stripped *unless* the token is itself an
/// abbreviation expansion").
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "test", "testing", "scan", "scanning", "screen", "screening", "check", "the", "of",
    ])
});

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[_\-./]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Tokens produced by expanding an abbreviation — never stripped as stopwords even if
/// they happen to also appear in `STOPWORDS` (none currently do, but this keeps the
/// exemption correct if the table grows a stopword-colliding expansion).
fn expansion_tokens() -> &'static HashSet<&'static str> {
    static EXPANSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
        ABBREVIATIONS
            .values()
            .flat_map(|expansion| expansion.split_whitespace())
            .collect()
    });
    &EXPANSIONS
}

/// Lower-case, collapse whitespace, map separators to spaces, expand abbreviations,
/// strip stopwords (§4.1.3).
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let separated = SEPARATORS.replace_all(&lowered, " ");
    let collapsed = WHITESPACE.replace_all(separated.trim(), " ");

    let tokens: Vec<String> = collapsed
        .split(' ')
        .filter(|t| !t.is_empty())
        .map(|token| ABBREVIATIONS.get(token).copied().unwrap_or(token).to_string())
        .flat_map(|token| token.split(' ').map(str::to_string).collect::<Vec<_>>())
        .filter(|token| expansion_tokens().contains(token.as_str()) || !STOPWORDS.contains(token.as_str()))
        .collect();

    tokens.join(" ")
}

/// Ratcliff/Obershelp-style character similarity: twice the length of matching
/// characters (recursively, over the longest common substring and its left/right
/// remainders) divided by the combined length of both strings.
pub fn char_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let matches = matching_chars(&a, &b);
    (2.0 * matches as f64) / (a.len() + b.len()) as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let (len, ai, bi) = longest_common_substring(a, b);
    if len == 0 {
        return 0;
    }
    matching_chars(&a[..ai], &b[..bi]) + len + matching_chars(&a[ai + len..], &b[bi + len..])
}

/// Returns (length, start_in_a, start_in_b) of the longest common substring.
fn longest_common_substring(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut dp = vec![0usize; b.len() + 1];
    for i in 0..a.len() {
        let mut prev_row = vec![0usize; b.len() + 1];
        std::mem::swap(&mut dp, &mut prev_row);
        dp[0] = 0;
        for j in 0..b.len() {
            if a[i] == b[j] {
                dp[j + 1] = prev_row[j] + 1;
                if dp[j + 1] > best.0 {
                    best = (dp[j + 1], i + 1 - dp[j + 1], j + 1 - dp[j + 1]);
                }
            } else {
                dp[j + 1] = 0;
            }
        }
    }
    best
}

/// Token-set Jaccard similarity over normalised whitespace-separated tokens.
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    let set_a: HashSet<&str> = a.split_whitespace().collect();
    let set_b: HashSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// §4.1.3: "the maximum of (a) character-level similarity ... and (b) token-set
/// Jaccard", both computed against normalised strings.
pub fn fuzzy_similarity(a: &str, b: &str) -> f64 {
    let na = normalize(a);
    let nb = normalize(b);
    char_similarity(&na, &nb).max(token_jaccard(&na, &nb))
}

/// Canonical screening-type resolution threshold (§4.1.3).
pub const CANONICAL_TYPE_THRESHOLD: f64 = 0.87;
/// Trigger-condition matching threshold (§4.1.1 rule 3, §4.1.3).
pub const TRIGGER_CONDITION_THRESHOLD: f64 = 0.80;

/// §4.1.2: "a document evidences the screening if its extracted text matches any
/// keyword ... under word-boundary regex; multi-word keywords require all words present
/// as a whitespace-separated sequence; matching is case-insensitive."
pub fn document_matches_keyword(text: &str, keyword: &str) -> bool {
    let pattern = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    if pattern.is_empty() {
        return false;
    }
    let wrapped = format!(r"(?i)\b{}\b", pattern);
    Regex::new(&wrapped)
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

pub fn document_matches_any_keyword(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|kw| document_matches_keyword(text, kw))
}

/// §4.1.1 rule 3: fuzzy-match a screening type's trigger-condition names against the
/// patient's active condition names, accepting at the trigger threshold.
pub fn any_trigger_matches(trigger_conditions: &[String], patient_conditions: &[String]) -> bool {
    trigger_conditions.iter().any(|trigger| {
        patient_conditions
            .iter()
            .any(|condition| fuzzy_similarity(trigger, condition) >= TRIGGER_CONDITION_THRESHOLD)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Mammography   Screening "), "mammography");
    }

    #[test]
    fn normalize_expands_abbreviations() {
        assert_eq!(normalize("DXA scan"), "dexa");
        assert_eq!(normalize("EKG"), "ecg");
    }

    #[test]
    fn normalize_maps_separators_to_spaces() {
        assert_eq!(normalize("colon-oscopy_prep.note"), "colon oscopy prep note");
    }

    #[test]
    fn normalize_keeps_stopword_when_it_is_an_expansion_token() {
        // "of" is a stopword but also appears inside no expansion here; sanity check
        // that ordinary stopwords are still stripped.
        assert_eq!(normalize("history of screening"), "history");
    }

    #[test]
    fn char_similarity_identical_strings_is_one() {
        assert_eq!(char_similarity("mammogram", "mammogram"), 1.0);
    }

    #[test]
    fn char_similarity_detects_close_match() {
        let sim = char_similarity("mammogram", "mammography");
        assert!(sim > 0.7, "expected high similarity, got {sim}");
    }

    #[test]
    fn fuzzy_similarity_crosses_canonical_threshold_for_near_synonyms() {
        let sim = fuzzy_similarity("mammogram", "mammography screening");
        assert!(sim >= CANONICAL_TYPE_THRESHOLD, "got {sim}");
    }

    #[test]
    fn document_matches_keyword_is_case_insensitive_word_boundary() {
        assert!(document_matches_keyword(
            "Mammography: bilateral screening, BI-RADS 1",
            "mammography"
        ));
        assert!(!document_matches_keyword("inflammatory note", "mammo"));
    }

    #[test]
    fn document_matches_multiword_keyword_requires_sequence() {
        assert!(document_matches_keyword(
            "Patient had a colon cancer screening last year",
            "colon cancer"
        ));
        assert!(!document_matches_keyword(
            "colon was clear, no cancer found",
            "colon cancer"
        ));
    }

    #[test]
    fn trigger_condition_fuzzy_match_at_threshold() {
        let triggers = vec!["diabetes mellitus".to_string()];
        let conditions = vec!["diabetes mellitus type 2".to_string()];
        assert!(any_trigger_matches(&triggers, &conditions));
    }
}
