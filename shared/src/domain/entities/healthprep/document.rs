use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_processing_status", rename_all = "snake_case")]
pub enum DocumentProcessingStatus {
    Pending,
    OcrComplete,
    PhiFiltered,
    Failed,
}

/// Where a document record originated — §9 Design Notes open question 2 keeps these
/// distinct for provenance while the matcher (§4.1.2) treats both as one logical stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_source", rename_all = "snake_case")]
pub enum DocumentSource {
    /// Manually uploaded (the source system's `Document` table).
    Local,
    /// Pulled from the EMR (the source system's `FHIRDocument` table).
    Fhir,
}

/// §3 "Document (local) and FHIRDocument (EMR-sourced)", unified behind one entity with
/// a `source` discriminator. Both tables of the source system map onto this one struct;
/// the repository layer is responsible for keeping them in physically distinct tables
/// for provenance, matching the open question's resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDocument {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub patient_id: Uuid,
    pub source: DocumentSource,
    pub content_type: String,
    pub document_date: NaiveDate,
    /// Present only after OCR + PHI filtering have both run (§4.4).
    pub extracted_text: Option<String>,
    /// Derived only from structured codes via the closed LOINC lookup table (§4.4,
    /// §8 property 6). Never the EMR's free-text `title`/`description`.
    pub safe_title: String,
    pub loinc_code: Option<String>,
    pub category_code: Option<String>,
    /// Epic document id, set only when `source = Fhir`.
    pub source_id: Option<String>,
    pub processing_status: DocumentProcessingStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientDocument {
    pub fn new(
        tenant_id: Uuid,
        patient_id: Uuid,
        source: DocumentSource,
        content_type: String,
        document_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            patient_id,
            source,
            content_type,
            document_date,
            extracted_text: None,
            safe_title: "Document".to_string(),
            loinc_code: None,
            category_code: None,
            source_id: None,
            processing_status: DocumentProcessingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}
