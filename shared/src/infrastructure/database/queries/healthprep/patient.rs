const PATIENT_FIELDS: &str = r#"
        id, tenant_id, provider_id, mrn, epic_patient_id, name, date_of_birth, sex,
        last_fhir_sync, documents_last_evaluated_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
"#;

pub const PATIENT_INSERT: &str = r#"
    INSERT INTO patients (
        id, tenant_id, provider_id, mrn, epic_patient_id, name, date_of_birth, sex,
        last_fhir_sync, documents_last_evaluated_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
    RETURNING
        id, tenant_id, provider_id, mrn, epic_patient_id, name, date_of_birth, sex,
        last_fhir_sync, documents_last_evaluated_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
"#;

pub const PATIENT_FIND_BY_MRN: &str = r#"
    SELECT
        id, tenant_id, provider_id, mrn, epic_patient_id, name, date_of_birth, sex,
        last_fhir_sync, documents_last_evaluated_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    FROM patients
    WHERE tenant_id = $1 AND mrn = $2
"#;

pub const PATIENT_FIND_BY_EPIC_PATIENT_ID: &str = r#"
    SELECT
        id, tenant_id, provider_id, mrn, epic_patient_id, name, date_of_birth, sex,
        last_fhir_sync, documents_last_evaluated_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    FROM patients
    WHERE tenant_id = $1 AND epic_patient_id = $2
"#;

pub const PATIENT_UPDATE: &str = r#"
    UPDATE patients SET
        provider_id = $2, mrn = $3, epic_patient_id = $4, name = $5, date_of_birth = $6,
        sex = $7, last_fhir_sync = $8, documents_last_evaluated_at = $9,
        updated_at = $10, updated_by = $11, version = $12
    WHERE id = $1 AND version = $13
    RETURNING
        id, tenant_id, provider_id, mrn, epic_patient_id, name, date_of_birth, sex,
        last_fhir_sync, documents_last_evaluated_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
"#;

pub const PATIENT_LIST_STALE: &str = r#"
    SELECT
        id, tenant_id, provider_id, mrn, epic_patient_id, name, date_of_birth, sex,
        last_fhir_sync, documents_last_evaluated_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    FROM patients
    WHERE tenant_id = $1
    ORDER BY COALESCE(documents_last_evaluated_at, TIMESTAMP 'epoch') ASC
    LIMIT $2
"#;

/// §4.7 provider-scope query pattern: `unrestricted` skips the provider predicate
/// entirely so admins/root admins see every provider's roster in the tenant.
pub fn patient_find_by_id_scoped(unrestricted: bool) -> String {
    if unrestricted {
        format!("SELECT {PATIENT_FIELDS} FROM patients WHERE tenant_id = $1 AND id = $2")
    } else {
        format!(
            "SELECT {PATIENT_FIELDS} FROM patients WHERE tenant_id = $1 AND id = $2 AND (provider_id = ANY($3) OR provider_id IS NULL)"
        )
    }
}

pub fn patient_list_for_scope(unrestricted: bool) -> String {
    if unrestricted {
        format!("SELECT {PATIENT_FIELDS} FROM patients WHERE tenant_id = $1 ORDER BY name ASC")
    } else {
        format!(
            "SELECT {PATIENT_FIELDS} FROM patients WHERE tenant_id = $1 AND (provider_id = ANY($2) OR provider_id IS NULL) ORDER BY name ASC"
        )
    }
}

pub const PATIENT_CONDITION_INSERT: &str = r#"
    INSERT INTO patient_conditions (
        id, patient_id, tenant_id, condition_name, icd10_code, active, onset_date,
        created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
    RETURNING id, patient_id, tenant_id, condition_name, icd10_code, active, onset_date, created_at, updated_at
"#;

pub const PATIENT_CONDITION_UPDATE: &str = r#"
    UPDATE patient_conditions SET
        condition_name = $2, icd10_code = $3, active = $4, onset_date = $5, updated_at = $6
    WHERE id = $1
    RETURNING id, patient_id, tenant_id, condition_name, icd10_code, active, onset_date, created_at, updated_at
"#;

pub const PATIENT_CONDITION_LIST: &str = r#"
    SELECT id, patient_id, tenant_id, condition_name, icd10_code, active, onset_date, created_at, updated_at
    FROM patient_conditions
    WHERE patient_id = $1
"#;

pub const PATIENT_CONDITION_LIST_ACTIVE: &str = r#"
    SELECT id, patient_id, tenant_id, condition_name, icd10_code, active, onset_date, created_at, updated_at
    FROM patient_conditions
    WHERE patient_id = $1 AND active = TRUE
"#;
