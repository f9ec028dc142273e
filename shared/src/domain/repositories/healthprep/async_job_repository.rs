use async_trait::async_trait;
use crate::domain::entities::healthprep::{AsyncJob, JobStatus};
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait AsyncJobRepository: Send + Sync {
    async fn create(&self, job: AsyncJob) -> AppResult<AsyncJob>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AsyncJob>>;
    async fn update(&self, job: AsyncJob) -> AppResult<AsyncJob>;
    async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<AsyncJob>>;
    /// §4.5 durable FIFO queue pop, ordered by priority then enqueue time, excluding
    /// tenants already at their concurrency cap (filtered by the caller's in-flight set).
    async fn list_queued(&self, limit: u32) -> AppResult<Vec<AsyncJob>>;
    async fn count_running_for_tenant(&self, tenant_id: Uuid) -> AppResult<i64>;
    async fn find_by_status(&self, status: JobStatus, limit: u32) -> AppResult<Vec<AsyncJob>>;
}
