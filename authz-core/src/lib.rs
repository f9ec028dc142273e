pub mod auth;
pub mod authorization;
pub mod fhir;
pub mod oidc;
pub mod zanzibar;
pub mod dto;

pub use auth::{LoginUseCase, LogoutUseCase, RefreshTokenUseCase, UserInfoUseCase};
pub use authorization::GetUserPermissionsUseCase;
pub use fhir::{
    CredentialScope, CredentialStore, EncryptedCredentialStore, FhirClient, FhirClientFactory, FhirCredentials,
};
pub use oidc::{TokenManager, Jwks, OidcProvider, Claims};

