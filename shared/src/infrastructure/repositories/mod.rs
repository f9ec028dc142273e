pub mod user_repository_impl;
pub mod key_repository_impl;
pub mod relationship_repository_impl;
pub mod role_repository_impl;
pub mod permission_repository_impl;
pub mod refresh_token_repository_impl;
pub mod setup_repository_impl;
pub mod healthprep;

pub use user_repository_impl::UserRepositoryImpl;
pub use key_repository_impl::KeyRepositoryImpl;
pub use relationship_repository_impl::RelationshipRepositoryImpl;
pub use role_repository_impl::RoleRepositoryImpl;
pub use permission_repository_impl::PermissionRepositoryImpl;
pub use refresh_token_repository_impl::RefreshTokenRepositoryImpl;
pub use setup_repository_impl::SetupRepositoryImpl;
pub use healthprep::{
    AppointmentRepositoryImpl, AsyncJobRepositoryImpl, AuditRepositoryImpl,
    DocumentRepositoryImpl, FhirApiCallRepositoryImpl, PatientRepositoryImpl,
    ProviderRepositoryImpl, ScreeningRepositoryImpl, ScreeningTypeRepositoryImpl,
    TenantRepositoryImpl,
};

