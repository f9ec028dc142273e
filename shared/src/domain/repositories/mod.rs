pub mod user_repository;
pub mod key_repository;
pub mod relationship_repository;
pub mod role_repository;
pub mod permission_repository;
pub mod refresh_token_repository;
pub mod setup_repository;
pub mod healthprep;

pub use user_repository::UserRepository;
pub use key_repository::KeyRepository;
pub use relationship_repository::RelationshipRepository;
pub use role_repository::RoleRepository;
pub use permission_repository::PermissionRepository;
pub use refresh_token_repository::RefreshTokenRepository;
pub use setup_repository::SetupRepository;
pub use healthprep::*;

