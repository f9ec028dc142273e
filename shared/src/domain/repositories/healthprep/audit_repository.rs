use async_trait::async_trait;
use crate::domain::entities::healthprep::AuditEntry;
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Append-only (§4.7): no update/delete methods exist on this trait by design.
    async fn record(&self, entry: AuditEntry) -> AppResult<AuditEntry>;
    async fn list_for_tenant(&self, tenant_id: Uuid, limit: u32, offset: u32) -> AppResult<Vec<AuditEntry>>;
    async fn list_for_resource(&self, resource_id: Uuid) -> AppResult<Vec<AuditEntry>>;
    /// §3 "Tenant" cascade-delete: re-parent every row for `tenant_id` to the system tenant.
    async fn reparent_tenant_entries(&self, tenant_id: Uuid) -> AppResult<u64>;
}
