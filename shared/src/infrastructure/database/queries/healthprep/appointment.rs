pub const APPOINTMENT_UPSERT_BY_SOURCE_ID: &str = r#"
    INSERT INTO appointments (
        id, tenant_id, patient_id, provider_id, scheduled_at, appointment_type,
        status, source_id, created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
    ON CONFLICT (tenant_id, source_id) WHERE source_id IS NOT NULL DO UPDATE SET
        provider_id = EXCLUDED.provider_id,
        scheduled_at = EXCLUDED.scheduled_at,
        appointment_type = EXCLUDED.appointment_type,
        status = EXCLUDED.status,
        updated_at = EXCLUDED.updated_at
    RETURNING
        id, tenant_id, patient_id, provider_id, scheduled_at, appointment_type,
        status, source_id, created_at, updated_at
"#;

pub const APPOINTMENT_FIND_BY_ID: &str = r#"
    SELECT
        id, tenant_id, patient_id, provider_id, scheduled_at, appointment_type,
        status, source_id, created_at, updated_at
    FROM appointments
    WHERE id = $1
"#;

pub const APPOINTMENT_LIST_FOR_PATIENT: &str = r#"
    SELECT
        id, tenant_id, patient_id, provider_id, scheduled_at, appointment_type,
        status, source_id, created_at, updated_at
    FROM appointments
    WHERE patient_id = $1
    ORDER BY scheduled_at ASC
"#;

pub const APPOINTMENT_LIST_UPCOMING_FOR_TENANT: &str = r#"
    SELECT
        id, tenant_id, patient_id, provider_id, scheduled_at, appointment_type,
        status, source_id, created_at, updated_at
    FROM appointments
    WHERE tenant_id = $1
      AND scheduled_at >= now()
      AND scheduled_at <= now() + make_interval(days => $2)
      AND status IN ('scheduled', 'booked', 'pending', 'arrived')
    ORDER BY scheduled_at ASC
"#;
