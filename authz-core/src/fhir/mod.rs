//! §4.3 "OAuth2 Token Manager (FHIR Client)": the request-issuing client, built on
//! the `oidc` module's SMART-on-FHIR discovery and token exchange primitives.

pub mod client;
pub mod credential_store;
pub mod factory;

pub use client::{CredentialScope, CredentialStore, FhirClient, FhirCredentials, InMemoryHourlyCounters};
pub use credential_store::EncryptedCredentialStore;
pub use factory::FhirClientFactory;
