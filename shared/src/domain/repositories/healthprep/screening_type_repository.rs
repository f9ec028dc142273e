use async_trait::async_trait;
use crate::domain::entities::healthprep::ScreeningType;
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait ScreeningTypeRepository: Send + Sync {
    async fn create(&self, screening_type: ScreeningType) -> AppResult<ScreeningType>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ScreeningType>>;
    async fn update(&self, screening_type: ScreeningType) -> AppResult<ScreeningType>;
    /// Types visible to a tenant: its own plus `tenant_id IS NULL` globals (§3,
    /// §9 open question 4).
    async fn list_visible_to_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ScreeningType>>;
    async fn list_active_visible_to_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ScreeningType>>;
    async fn list_variants_of(&self, base_type_id: Uuid) -> AppResult<Vec<ScreeningType>>;
}
