use async_trait::async_trait;
use crate::domain::entities::healthprep::{Patient, PatientCondition};
use crate::shared::AppResult;
use uuid::Uuid;

/// §4.7 provider-scope query pattern: `tenant_id = … AND (provider_id = ANY(accessible)
/// OR provider_id IS NULL)`. Implementations apply this filter, never the caller.
///
/// `unrestricted` is set for admins and root admins (§3 "User": admins see every
/// provider's roster in their organization) so the query layer can skip the provider
/// predicate entirely rather than require the caller to enumerate every provider id in
/// the tenant just to express "no restriction".
#[derive(Debug, Clone)]
pub struct ProviderScope {
    pub tenant_id: Uuid,
    pub accessible_provider_ids: Vec<Uuid>,
    pub unrestricted: bool,
}

impl ProviderScope {
    pub fn unrestricted(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            accessible_provider_ids: Vec::new(),
            unrestricted: true,
        }
    }

    pub fn restricted(tenant_id: Uuid, accessible_provider_ids: Vec<Uuid>) -> Self {
        Self {
            tenant_id,
            accessible_provider_ids,
            unrestricted: false,
        }
    }

    /// §8 property 5: does `provider_id` fall within this scope.
    pub fn allows(&self, provider_id: Option<Uuid>) -> bool {
        if self.unrestricted {
            return true;
        }
        match provider_id {
            None => true,
            Some(id) => self.accessible_provider_ids.contains(&id),
        }
    }
}

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn create(&self, patient: Patient) -> AppResult<Patient>;
    async fn find_by_id(&self, scope: &ProviderScope, id: Uuid) -> AppResult<Option<Patient>>;
    async fn find_by_mrn(&self, tenant_id: Uuid, mrn: &str) -> AppResult<Option<Patient>>;
    async fn find_by_epic_patient_id(
        &self,
        tenant_id: Uuid,
        epic_patient_id: &str,
    ) -> AppResult<Option<Patient>>;
    async fn update(&self, patient: Patient) -> AppResult<Patient>;
    async fn list_for_scope(&self, scope: &ProviderScope) -> AppResult<Vec<Patient>>;
    /// Patients due for a §4.1.4 selective refresh sweep within a tenant.
    async fn list_stale(&self, tenant_id: Uuid, limit: u32) -> AppResult<Vec<Patient>>;

    async fn add_condition(&self, condition: PatientCondition) -> AppResult<PatientCondition>;
    /// §4.2 step 2: "flip `is_active` when `clinicalStatus` changes".
    async fn update_condition(&self, condition: PatientCondition) -> AppResult<PatientCondition>;
    async fn list_conditions(&self, patient_id: Uuid) -> AppResult<Vec<PatientCondition>>;
    async fn list_active_conditions(&self, patient_id: Uuid) -> AppResult<Vec<PatientCondition>>;
}
