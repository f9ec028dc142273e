pub const PROVIDER_INSERT: &str = r#"
    INSERT INTO providers (
        id, tenant_id, name, specialty, epic_practitioner_id, oauth, active,
        request_id, created_at, updated_at, created_by, updated_by, system_id, version
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
    RETURNING
        id, tenant_id, name, specialty, epic_practitioner_id, oauth, active,
        request_id, created_at, updated_at, created_by, updated_by, system_id, version
"#;

pub const PROVIDER_FIND_BY_ID: &str = r#"
    SELECT
        id, tenant_id, name, specialty, epic_practitioner_id, oauth, active,
        request_id, created_at, updated_at, created_by, updated_by, system_id, version
    FROM providers
    WHERE tenant_id = $1 AND id = $2
"#;

/// Unscoped by tenant: used only by infrastructure callers (e.g. the FHIR credential
/// store) that already hold a `CredentialScope::Provider(id)` with no tenant id in
/// hand. Never exposed through a PHI-bearing query path — those all go through
/// `find_by_id`, which enforces tenant scope.
pub const PROVIDER_FIND_BY_ID_UNSCOPED: &str = r#"
    SELECT
        id, tenant_id, name, specialty, epic_practitioner_id, oauth, active,
        request_id, created_at, updated_at, created_by, updated_by, system_id, version
    FROM providers
    WHERE id = $1
"#;

pub const PROVIDER_FIND_BY_EPIC_PRACTITIONER_ID: &str = r#"
    SELECT
        id, tenant_id, name, specialty, epic_practitioner_id, oauth, active,
        request_id, created_at, updated_at, created_by, updated_by, system_id, version
    FROM providers
    WHERE tenant_id = $1 AND epic_practitioner_id = $2
"#;

pub const PROVIDER_UPDATE: &str = r#"
    UPDATE providers SET
        name = $2, specialty = $3, epic_practitioner_id = $4, oauth = $5, active = $6,
        updated_at = $7, updated_by = $8, version = $9
    WHERE id = $1 AND version = $10
    RETURNING
        id, tenant_id, name, specialty, epic_practitioner_id, oauth, active,
        request_id, created_at, updated_at, created_by, updated_by, system_id, version
"#;

pub const PROVIDER_LIST_FOR_TENANT: &str = r#"
    SELECT
        id, tenant_id, name, specialty, epic_practitioner_id, oauth, active,
        request_id, created_at, updated_at, created_by, updated_by, system_id, version
    FROM providers
    WHERE tenant_id = $1
    ORDER BY name ASC
"#;

pub const USER_PROVIDER_ASSIGNMENT_INSERT: &str = r#"
    INSERT INTO user_provider_assignments (id, user_id, provider_id, capabilities, created_at)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, user_id, provider_id, capabilities, created_at
"#;

pub const USER_PROVIDER_ASSIGNMENT_ACCESSIBLE_IDS: &str = r#"
    SELECT provider_id FROM user_provider_assignments WHERE user_id = $1
"#;
