pub const FHIR_API_CALL_INSERT: &str = r#"
    INSERT INTO fhir_api_calls (
        id, tenant_id, provider_id, endpoint, method, resource_type, response_status,
        response_time_ms, called_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    RETURNING
        id, tenant_id, provider_id, endpoint, method, resource_type, response_status,
        response_time_ms, called_at
"#;

/// §4.2/§5 hourly rate-limit check.
pub const FHIR_API_CALL_COUNT_SINCE: &str = r#"
    SELECT COUNT(*) FROM fhir_api_calls WHERE tenant_id = $1 AND called_at >= $2
"#;
