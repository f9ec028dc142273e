use async_trait::async_trait;
use crate::domain::entities::healthprep::Tenant;
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    async fn create(&self, tenant: Tenant) -> AppResult<Tenant>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tenant>>;
    async fn update(&self, tenant: Tenant) -> AppResult<Tenant>;
    /// Cascades across tenant-scoped entities; audit entries are re-parented
    /// to the system tenant rather than deleted.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    async fn list(&self, limit: u32, offset: u32) -> AppResult<Vec<Tenant>>;
    async fn list_pending_approval(&self) -> AppResult<Vec<Tenant>>;
}
