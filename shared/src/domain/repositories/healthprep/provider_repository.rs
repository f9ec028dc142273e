use async_trait::async_trait;
use crate::domain::entities::healthprep::{Provider, UserProviderAssignment};
use crate::shared::AppResult;
use uuid::Uuid;

#[async_trait]
pub trait ProviderRepository: Send + Sync {
    async fn create(&self, provider: Provider) -> AppResult<Provider>;
    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> AppResult<Option<Provider>>;
    async fn find_by_epic_practitioner_id(
        &self,
        tenant_id: Uuid,
        epic_practitioner_id: &str,
    ) -> AppResult<Option<Provider>>;
    async fn update(&self, provider: Provider) -> AppResult<Provider>;
    async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Provider>>;
    /// Infrastructure-only lookup with no tenant-scope predicate, for callers (the
    /// FHIR credential store) that address a provider purely by
    /// `CredentialScope::Provider(id)`. Never call this from a PHI query path.
    async fn find_by_id_unscoped(&self, id: Uuid) -> AppResult<Option<Provider>>;

    async fn assign_user(
        &self,
        assignment: UserProviderAssignment,
    ) -> AppResult<UserProviderAssignment>;
    /// §4.7 provider-scope query pattern: the set of provider ids a user may act for.
    async fn accessible_provider_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;
}
