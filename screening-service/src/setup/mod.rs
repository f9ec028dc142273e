pub mod setup_organization;
pub mod create_super_admin;

pub use setup_organization::TenantOnboardingUseCase;
pub use create_super_admin::CreateRootAdminUseCase;
