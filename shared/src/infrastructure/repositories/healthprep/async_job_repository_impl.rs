use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{AsyncJob, JobPriority, JobStatus, JobType};
use crate::domain::repositories::healthprep::AsyncJobRepository;
use crate::infrastructure::database::queries::healthprep::async_job::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct AsyncJobRow {
    id: Uuid,
    tenant_id: Uuid,
    user_id: Uuid,
    job_type: JobType,
    status: JobStatus,
    priority: JobPriority,
    total_items: i32,
    completed_items: i32,
    failed_items: i32,
    inputs: serde_json::Value,
    results: Option<serde_json::Value>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    error_message: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AsyncJobRow> for AsyncJob {
    fn from(row: AsyncJobRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            user_id: row.user_id,
            job_type: row.job_type,
            status: row.status,
            priority: row.priority,
            total_items: row.total_items,
            completed_items: row.completed_items,
            failed_items: row.failed_items,
            inputs: row.inputs,
            results: row.results,
            started_at: row.started_at,
            completed_at: row.completed_at,
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct AsyncJobRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl AsyncJobRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl AsyncJobRepository for AsyncJobRepositoryImpl {
    async fn create(&self, job: AsyncJob) -> AppResult<AsyncJob> {
        sqlx::query_as::<_, AsyncJobRow>(ASYNC_JOB_INSERT)
            .bind(job.id)
            .bind(job.tenant_id)
            .bind(job.user_id)
            .bind(job.job_type)
            .bind(job.status)
            .bind(job.priority)
            .bind(job.total_items)
            .bind(job.completed_items)
            .bind(job.failed_items)
            .bind(job.inputs)
            .bind(job.results)
            .bind(job.started_at)
            .bind(job.completed_at)
            .bind(job.error_message)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(AsyncJob::from)
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AsyncJob>> {
        sqlx::query_as::<_, AsyncJobRow>(ASYNC_JOB_FIND_BY_ID)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(AsyncJob::from))
            .map_err(AppError::Database)
    }

    async fn update(&self, job: AsyncJob) -> AppResult<AsyncJob> {
        sqlx::query_as::<_, AsyncJobRow>(ASYNC_JOB_UPDATE)
            .bind(job.id)
            .bind(job.status)
            .bind(job.total_items)
            .bind(job.completed_items)
            .bind(job.failed_items)
            .bind(job.results)
            .bind(job.started_at)
            .bind(job.completed_at)
            .bind(job.error_message)
            .bind(job.updated_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(AsyncJob::from)
            .map_err(AppError::Database)
    }

    async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<AsyncJob>> {
        sqlx::query_as::<_, AsyncJobRow>(ASYNC_JOB_LIST_FOR_TENANT)
            .bind(tenant_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(AsyncJob::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_queued(&self, limit: u32) -> AppResult<Vec<AsyncJob>> {
        sqlx::query_as::<_, AsyncJobRow>(ASYNC_JOB_LIST_QUEUED)
            .bind(limit as i64)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(AsyncJob::from).collect())
            .map_err(AppError::Database)
    }

    async fn count_running_for_tenant(&self, tenant_id: Uuid) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as(ASYNC_JOB_COUNT_RUNNING_FOR_TENANT)
            .bind(tenant_id)
            .fetch_one(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(count)
    }

    async fn find_by_status(&self, status: JobStatus, limit: u32) -> AppResult<Vec<AsyncJob>> {
        sqlx::query_as::<_, AsyncJobRow>(ASYNC_JOB_FIND_BY_STATUS)
            .bind(status)
            .bind(limit as i64)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(AsyncJob::from).collect())
            .map_err(AppError::Database)
    }
}
