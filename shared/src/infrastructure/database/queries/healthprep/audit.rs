pub const AUDIT_ENTRY_INSERT: &str = r#"
    INSERT INTO audit_entries (
        id, tenant_id, user_id, event_type, resource_type, resource_id, data,
        ip_address, user_agent, session_id, occurred_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
    RETURNING
        id, tenant_id, user_id, event_type, resource_type, resource_id, data,
        ip_address, user_agent, session_id, occurred_at
"#;

pub const AUDIT_ENTRY_LIST_FOR_TENANT: &str = r#"
    SELECT
        id, tenant_id, user_id, event_type, resource_type, resource_id, data,
        ip_address, user_agent, session_id, occurred_at
    FROM audit_entries
    WHERE tenant_id = $1
    ORDER BY occurred_at DESC
    LIMIT $2 OFFSET $3
"#;

pub const AUDIT_ENTRY_LIST_FOR_RESOURCE: &str = r#"
    SELECT
        id, tenant_id, user_id, event_type, resource_type, resource_id, data,
        ip_address, user_agent, session_id, occurred_at
    FROM audit_entries
    WHERE resource_id = $1
    ORDER BY occurred_at DESC
"#;

/// §3 "Tenant" cascade delete: re-parent rather than delete.
pub const AUDIT_ENTRY_REPARENT_TENANT: &str = r#"
    UPDATE audit_entries SET tenant_id = $2 WHERE tenant_id = $1
"#;
