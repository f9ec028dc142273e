const FIELDS: &str = r#"
        s.id, s.tenant_id, s.patient_id, s.screening_type_id, s.provider_id, s.status,
        s.last_completed, s.next_due, s.is_dormant, s.last_processed,
        s.requires_vaccine_codes, s.created_at, s.updated_at, s.version
"#;

pub const SCREENING_INSERT: &str = r#"
    INSERT INTO screenings (
        id, tenant_id, patient_id, screening_type_id, provider_id, status,
        last_completed, next_due, is_dormant, last_processed, requires_vaccine_codes,
        created_at, updated_at, version
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
    RETURNING
        id, tenant_id, patient_id, screening_type_id, provider_id, status,
        last_completed, next_due, is_dormant, last_processed, requires_vaccine_codes,
        created_at, updated_at, version
"#;

pub const SCREENING_FIND_BY_ID: &str = r#"
    SELECT
        id, tenant_id, patient_id, screening_type_id, provider_id, status,
        last_completed, next_due, is_dormant, last_processed, requires_vaccine_codes,
        created_at, updated_at, version
    FROM screenings
    WHERE id = $1
"#;

pub const SCREENING_FIND_FOR_PATIENT_AND_TYPE: &str = r#"
    SELECT
        id, tenant_id, patient_id, screening_type_id, provider_id, status,
        last_completed, next_due, is_dormant, last_processed, requires_vaccine_codes,
        created_at, updated_at, version
    FROM screenings
    WHERE patient_id = $1 AND screening_type_id = $2
"#;

pub const SCREENING_UPDATE: &str = r#"
    UPDATE screenings SET
        provider_id = $2, status = $3, last_completed = $4, next_due = $5,
        is_dormant = $6, last_processed = $7, requires_vaccine_codes = $8,
        updated_at = $9, version = $10
    WHERE id = $1 AND version = $11
    RETURNING
        id, tenant_id, patient_id, screening_type_id, provider_id, status,
        last_completed, next_due, is_dormant, last_processed, requires_vaccine_codes,
        created_at, updated_at, version
"#;

pub const SCREENING_LIST_FOR_PATIENT: &str = r#"
    SELECT
        id, tenant_id, patient_id, screening_type_id, provider_id, status,
        last_completed, next_due, is_dormant, last_processed, requires_vaccine_codes,
        created_at, updated_at, version
    FROM screenings
    WHERE patient_id = $1
"#;

pub const SCREENING_DOCUMENTS_FOR: &str = r#"
    SELECT document_id FROM screening_documents WHERE screening_id = $1
"#;

pub const SCREENING_DOCUMENT_ASSOCIATE: &str = r#"
    INSERT INTO screening_documents (screening_id, document_id)
    VALUES ($1, $2)
    ON CONFLICT DO NOTHING
"#;

pub const SCREENING_DOCUMENT_DISSOCIATE: &str = r#"
    DELETE FROM screening_documents WHERE screening_id = $1 AND document_id = ANY($2)
"#;

/// §4.7: `unrestricted` skips the provider predicate; `include_superseded` controls
/// whether the default listing (excludes `superseded`) or full provenance is returned.
pub fn screening_list_for_scope(unrestricted: bool, include_superseded: bool) -> String {
    let provider_clause = if unrestricted {
        ""
    } else {
        "AND (s.provider_id = ANY($2) OR s.provider_id IS NULL)"
    };
    let superseded_clause = if include_superseded {
        ""
    } else {
        "AND s.status <> 'superseded'"
    };
    format!(
        "SELECT {FIELDS} FROM screenings s WHERE s.tenant_id = $1 {provider_clause} {superseded_clause} ORDER BY s.updated_at DESC"
    )
}
