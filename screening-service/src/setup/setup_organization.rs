use shared::domain::entities::healthprep::{EpicEnvironment, Tenant};
use shared::domain::repositories::healthprep::TenantRepository;
use shared::AppResult;
use uuid::Uuid;

/// Tenant onboarding (§3 "Tenant"): a new organization starts `pending_approval` and
/// only becomes usable once a root admin approves it.
pub struct TenantOnboardingUseCase {
    tenant_repository: Box<dyn TenantRepository>,
}

impl TenantOnboardingUseCase {
    pub fn new(tenant_repository: Box<dyn TenantRepository>) -> Self {
        Self { tenant_repository }
    }

    pub async fn execute(
        &self,
        name: &str,
        display_name: &str,
        epic_environment: EpicEnvironment,
    ) -> AppResult<Tenant> {
        if name.trim().is_empty() {
            return Err(shared::shared::AppError::Validation(
                "Tenant name cannot be empty".to_string(),
            ));
        }

        if !name.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(shared::shared::AppError::Validation(
                "Tenant name can only contain alphanumeric characters and hyphens".to_string(),
            ));
        }

        if self.tenant_repository.find_by_name(name).await?.is_some() {
            return Err(shared::shared::AppError::Conflict(
                "A tenant with this name already exists".to_string(),
            ));
        }

        let tenant = Tenant::new(name.to_string(), display_name.to_string(), epic_environment);
        self.tenant_repository.create(tenant).await
    }

    /// Root-admin-only (§3 "Tenant status: pending_approval -> active").
    pub async fn approve(&self, tenant_id: Uuid, approved_by: Uuid) -> AppResult<Tenant> {
        let mut tenant = self
            .tenant_repository
            .find_by_id(tenant_id)
            .await?
            .ok_or_else(|| shared::shared::AppError::NotFound("Tenant not found".to_string()))?;

        tenant.approve(approved_by);
        self.tenant_repository.update(tenant).await
    }
}
