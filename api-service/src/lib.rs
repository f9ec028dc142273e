pub mod infra;
pub mod presentation;

pub use presentation::*;

use std::sync::Arc;

use screening_service::prep_sheet::PrepSheetCompiler;
use screening_service::setup::{CreateRootAdminUseCase, TenantOnboardingUseCase};
use shared::domain::repositories::healthprep::{
    PatientRepository, ProviderRepository, ScreeningRepository, ScreeningTypeRepository,
    TenantRepository,
};
use shared::domain::repositories::UserRepository;

/// The generic `shared::AppState`, pinned to HealthPrep's concrete use cases.
type SharedAppState = shared::AppState<
    authz_core::auth::LoginUseCase,
    authz_core::auth::RefreshTokenUseCase,
    authz_core::auth::LogoutUseCase,
    authz_core::auth::UserInfoUseCase,
    TenantOnboardingUseCase,
    CreateRootAdminUseCase,
>;

/// Everything a handler needs beyond the teacher's generic application state: the
/// HealthPrep repositories and the async job runtime's submission queue. Wrapping
/// rather than extending `shared::AppState` keeps that struct free of domain-specific
/// fields the other consuming crates don't need.
pub struct AppState {
    pub shared: SharedAppState,
    pub user_repository: Arc<dyn UserRepository>,
    pub tenant_repository: Arc<dyn TenantRepository>,
    pub provider_repository: Arc<dyn ProviderRepository>,
    pub patient_repository: Arc<dyn PatientRepository>,
    pub screening_repository: Arc<dyn ScreeningRepository>,
    pub screening_type_repository: Arc<dyn ScreeningTypeRepository>,
    pub prep_sheet_compiler: Arc<PrepSheetCompiler>,
    pub job_queue: Arc<jobs_service::JobQueue>,
}

impl std::ops::Deref for AppState {
    type Target = SharedAppState;

    fn deref(&self) -> &Self::Target {
        &self.shared
    }
}
