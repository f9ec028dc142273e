pub const ASYNC_JOB_INSERT: &str = r#"
    INSERT INTO async_jobs (
        id, tenant_id, user_id, job_type, status, priority, total_items, completed_items,
        failed_items, inputs, results, started_at, completed_at, error_message,
        created_at, updated_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
    RETURNING
        id, tenant_id, user_id, job_type, status, priority, total_items, completed_items,
        failed_items, inputs, results, started_at, completed_at, error_message,
        created_at, updated_at
"#;

pub const ASYNC_JOB_FIND_BY_ID: &str = r#"
    SELECT
        id, tenant_id, user_id, job_type, status, priority, total_items, completed_items,
        failed_items, inputs, results, started_at, completed_at, error_message,
        created_at, updated_at
    FROM async_jobs
    WHERE id = $1
"#;

pub const ASYNC_JOB_UPDATE: &str = r#"
    UPDATE async_jobs SET
        status = $2, total_items = $3, completed_items = $4, failed_items = $5,
        results = $6, started_at = $7, completed_at = $8, error_message = $9,
        updated_at = $10
    WHERE id = $1
    RETURNING
        id, tenant_id, user_id, job_type, status, priority, total_items, completed_items,
        failed_items, inputs, results, started_at, completed_at, error_message,
        created_at, updated_at
"#;

pub const ASYNC_JOB_LIST_FOR_TENANT: &str = r#"
    SELECT
        id, tenant_id, user_id, job_type, status, priority, total_items, completed_items,
        failed_items, inputs, results, started_at, completed_at, error_message,
        created_at, updated_at
    FROM async_jobs
    WHERE tenant_id = $1
    ORDER BY created_at DESC
"#;

/// §4.5 durable FIFO pop: priority first (`high` > `normal` > `low`), then FIFO by
/// enqueue time within a priority lane.
pub const ASYNC_JOB_LIST_QUEUED: &str = r#"
    SELECT
        id, tenant_id, user_id, job_type, status, priority, total_items, completed_items,
        failed_items, inputs, results, started_at, completed_at, error_message,
        created_at, updated_at
    FROM async_jobs
    WHERE status = 'queued'
    ORDER BY
        CASE priority WHEN 'high' THEN 0 WHEN 'normal' THEN 1 ELSE 2 END,
        created_at ASC
    LIMIT $1
"#;

pub const ASYNC_JOB_COUNT_RUNNING_FOR_TENANT: &str = r#"
    SELECT COUNT(*) FROM async_jobs WHERE tenant_id = $1 AND status = 'running'
"#;

pub const ASYNC_JOB_FIND_BY_STATUS: &str = r#"
    SELECT
        id, tenant_id, user_id, job_type, status, priority, total_items, completed_items,
        failed_items, inputs, results, started_at, completed_at, error_message,
        created_at, updated_at
    FROM async_jobs
    WHERE status = $1
    ORDER BY created_at ASC
    LIMIT $2
"#;
