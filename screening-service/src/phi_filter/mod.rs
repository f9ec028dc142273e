//! §4.4 "OCR & PHI Filter": attachment text extraction, deterministic PHI redaction,
//! closed-lookup-table safe titles, and FHIR resource sanitisation.

pub mod ocr;
pub mod redact;
pub mod safe_title;
pub mod sanitize;

pub use ocr::{extract, ContentKind, OcrBackend, OcrResult};
pub use redact::{redact, RedactionCounts, RedactionResult};
pub use safe_title::{prep_sheet_category, safe_title, StructuredCoding};
pub use sanitize::{sanitize_resource, SanitizerSalt};
