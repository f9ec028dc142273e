/// Column order matches `TenantRow` for sqlx::FromRow.
pub const TENANT_SELECT_ALL_FIELDS: &str = r#"
    id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
    fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
    write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
    created_by, updated_by, system_id, version
"#;

pub const TENANT_INSERT: &str = r#"
    INSERT INTO tenants (
        id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
        fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
        write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)
    RETURNING
        id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
        fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
        write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
"#;

pub const TENANT_FIND_BY_ID: &str = r#"
    SELECT
        id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
        fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
        write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    FROM tenants
    WHERE id = $1
"#;

pub const TENANT_FIND_BY_NAME: &str = r#"
    SELECT
        id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
        fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
        write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    FROM tenants
    WHERE name = $1
"#;

pub const TENANT_UPDATE: &str = r#"
    UPDATE tenants SET
        name = $2, display_name = $3, epic_environment = $4, epic_client_id = $5,
        epic_client_secret_encrypted = $6, fhir_base_url = $7, oauth = $8, caps = $9,
        document_cutoffs = $10, phi_filter_settings = $11, phi_logging_level = $12,
        write_back_dry_run = $13, status = $14, last_sync_at = $15,
        updated_at = $16, updated_by = $17, version = $18
    WHERE id = $1 AND version = $19
    RETURNING
        id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
        fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
        write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
"#;

/// §3 "Tenant" cascade delete; callers re-parent audit entries first via
/// `AuditRepository::reparent_tenant_entries` before issuing this.
pub const TENANT_DELETE: &str = "DELETE FROM tenants WHERE id = $1";

pub const TENANT_LIST: &str = r#"
    SELECT
        id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
        fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
        write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    FROM tenants
    ORDER BY created_at DESC
    LIMIT $1 OFFSET $2
"#;

pub const TENANT_LIST_PENDING_APPROVAL: &str = r#"
    SELECT
        id, name, display_name, epic_environment, epic_client_id, epic_client_secret_encrypted,
        fhir_base_url, oauth, caps, document_cutoffs, phi_filter_settings, phi_logging_level,
        write_back_dry_run, status, last_sync_at, request_id, created_at, updated_at,
        created_by, updated_by, system_id, version
    FROM tenants
    WHERE status = 'pending_approval'
    ORDER BY created_at ASC
"#;
