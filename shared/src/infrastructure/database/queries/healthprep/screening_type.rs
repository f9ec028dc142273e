pub const SCREENING_TYPE_INSERT: &str = r#"
    INSERT INTO screening_types (
        id, tenant_id, name, keywords, eligible_sexes, min_age, max_age,
        frequency_value, frequency_unit, trigger_conditions, screening_category,
        variant_of, is_immunization_based, cvx_codes, active, criteria_signature,
        criteria_last_changed_at, request_id, created_at, updated_at, created_by,
        updated_by, system_id, version
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
    RETURNING
        id, tenant_id, name, keywords, eligible_sexes, min_age, max_age,
        frequency_value, frequency_unit, trigger_conditions, screening_category,
        variant_of, is_immunization_based, cvx_codes, active, criteria_signature,
        criteria_last_changed_at, request_id, created_at, updated_at, created_by,
        updated_by, system_id, version
"#;

pub const SCREENING_TYPE_FIND_BY_ID: &str = r#"
    SELECT
        id, tenant_id, name, keywords, eligible_sexes, min_age, max_age,
        frequency_value, frequency_unit, trigger_conditions, screening_category,
        variant_of, is_immunization_based, cvx_codes, active, criteria_signature,
        criteria_last_changed_at, request_id, created_at, updated_at, created_by,
        updated_by, system_id, version
    FROM screening_types
    WHERE id = $1
"#;

pub const SCREENING_TYPE_UPDATE: &str = r#"
    UPDATE screening_types SET
        name = $2, keywords = $3, eligible_sexes = $4, min_age = $5, max_age = $6,
        frequency_value = $7, frequency_unit = $8, trigger_conditions = $9,
        screening_category = $10, variant_of = $11, is_immunization_based = $12,
        cvx_codes = $13, active = $14, criteria_signature = $15,
        criteria_last_changed_at = $16, updated_at = $17, updated_by = $18, version = $19
    WHERE id = $1 AND version = $20
    RETURNING
        id, tenant_id, name, keywords, eligible_sexes, min_age, max_age,
        frequency_value, frequency_unit, trigger_conditions, screening_category,
        variant_of, is_immunization_based, cvx_codes, active, criteria_signature,
        criteria_last_changed_at, request_id, created_at, updated_at, created_by,
        updated_by, system_id, version
"#;

pub const SCREENING_TYPE_LIST_VISIBLE_TO_TENANT: &str = r#"
    SELECT
        id, tenant_id, name, keywords, eligible_sexes, min_age, max_age,
        frequency_value, frequency_unit, trigger_conditions, screening_category,
        variant_of, is_immunization_based, cvx_codes, active, criteria_signature,
        criteria_last_changed_at, request_id, created_at, updated_at, created_by,
        updated_by, system_id, version
    FROM screening_types
    WHERE tenant_id = $1 OR tenant_id IS NULL
"#;

pub const SCREENING_TYPE_LIST_ACTIVE_VISIBLE_TO_TENANT: &str = r#"
    SELECT
        id, tenant_id, name, keywords, eligible_sexes, min_age, max_age,
        frequency_value, frequency_unit, trigger_conditions, screening_category,
        variant_of, is_immunization_based, cvx_codes, active, criteria_signature,
        criteria_last_changed_at, request_id, created_at, updated_at, created_by,
        updated_by, system_id, version
    FROM screening_types
    WHERE (tenant_id = $1 OR tenant_id IS NULL) AND active = TRUE
"#;

pub const SCREENING_TYPE_LIST_VARIANTS_OF: &str = r#"
    SELECT
        id, tenant_id, name, keywords, eligible_sexes, min_age, max_age,
        frequency_value, frequency_unit, trigger_conditions, screening_category,
        variant_of, is_immunization_based, cvx_codes, active, criteria_signature,
        criteria_last_changed_at, request_id, created_at, updated_at, created_by,
        updated_by, system_id, version
    FROM screening_types
    WHERE variant_of = $1
"#;
