pub const DOCUMENT_INSERT: &str = r#"
    INSERT INTO patient_documents (
        id, tenant_id, patient_id, source, content_type, document_date, extracted_text,
        safe_title, loinc_code, category_code, source_id, processing_status,
        created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
    RETURNING
        id, tenant_id, patient_id, source, content_type, document_date, extracted_text,
        safe_title, loinc_code, category_code, source_id, processing_status,
        created_at, updated_at
"#;

pub const DOCUMENT_FIND_BY_ID: &str = r#"
    SELECT
        id, tenant_id, patient_id, source, content_type, document_date, extracted_text,
        safe_title, loinc_code, category_code, source_id, processing_status,
        created_at, updated_at
    FROM patient_documents
    WHERE id = $1
"#;

pub const DOCUMENT_FIND_BY_SOURCE_ID: &str = r#"
    SELECT
        id, tenant_id, patient_id, source, content_type, document_date, extracted_text,
        safe_title, loinc_code, category_code, source_id, processing_status,
        created_at, updated_at
    FROM patient_documents
    WHERE tenant_id = $1 AND source_id = $2
"#;

pub const DOCUMENT_UPDATE: &str = r#"
    UPDATE patient_documents SET
        content_type = $2, document_date = $3, extracted_text = $4, safe_title = $5,
        loinc_code = $6, category_code = $7, source_id = $8, processing_status = $9,
        updated_at = $10
    WHERE id = $1
    RETURNING
        id, tenant_id, patient_id, source, content_type, document_date, extracted_text,
        safe_title, loinc_code, category_code, source_id, processing_status,
        created_at, updated_at
"#;

pub const DOCUMENT_LIST_FOR_PATIENT: &str = r#"
    SELECT
        id, tenant_id, patient_id, source, content_type, document_date, extracted_text,
        safe_title, loinc_code, category_code, source_id, processing_status,
        created_at, updated_at
    FROM patient_documents
    WHERE patient_id = $1
    ORDER BY document_date DESC
"#;

pub const DOCUMENT_LIST_FOR_PATIENT_SINCE: &str = r#"
    SELECT
        id, tenant_id, patient_id, source, content_type, document_date, extracted_text,
        safe_title, loinc_code, category_code, source_id, processing_status,
        created_at, updated_at
    FROM patient_documents
    WHERE patient_id = $1 AND ($2::timestamptz IS NULL OR created_at > $2)
    ORDER BY document_date DESC
"#;
