//! Builds and caches a `FhirClient` per tenant's Epic app registration (§4.3: "One
//! instance per tenant's Epic registration"). Discovery (`/.well-known/smart-
//! configuration`) only needs to happen once per tenant per process lifetime, so a
//! built client is kept in the cache until `invalidate` is called (on Epic config
//! changes during onboarding/settings updates).

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use shared::domain::entities::healthprep::Tenant;
use shared::domain::repositories::healthprep::FhirApiCallRepository;
use shared::shared::{AppError, AppResult};

use crate::oidc::OidcProvider;

use super::client::{CredentialStore, FhirClient};
use super::credential_store::decrypt_with_process_key;

pub struct FhirClientFactory {
    credentials: Arc<dyn CredentialStore>,
    api_calls: Arc<dyn FhirApiCallRepository>,
    redirect_url: String,
    cache: DashMap<Uuid, Arc<FhirClient>>,
}

impl FhirClientFactory {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        api_calls: Arc<dyn FhirApiCallRepository>,
        redirect_url: String,
    ) -> Self {
        Self { credentials, api_calls, redirect_url, cache: DashMap::new() }
    }

    /// Drops a cached client so the next `for_tenant` call rediscovers and rebuilds
    /// it — call this after a tenant's Epic registration is edited.
    pub fn invalidate(&self, tenant_id: Uuid) {
        self.cache.remove(&tenant_id);
    }

    pub async fn for_tenant(&self, tenant: &Tenant) -> AppResult<Arc<FhirClient>> {
        if let Some(existing) = self.cache.get(&tenant.id) {
            return Ok(existing.clone());
        }

        let client_id = tenant.epic_client_id.clone().ok_or_else(|| {
            AppError::Configuration(format!("tenant {} has no Epic client id configured", tenant.id))
        })?;
        let fhir_base_url = tenant.fhir_base_url.clone().ok_or_else(|| {
            AppError::Configuration(format!("tenant {} has no FHIR base url configured", tenant.id))
        })?;
        let client_secret = match &tenant.epic_client_secret_encrypted {
            Some(blob) => Some(
                String::from_utf8(decrypt_with_process_key(blob)?).map_err(|e| {
                    AppError::Encryption(format!("stored Epic client secret is not valid UTF-8: {e}"))
                })?,
            ),
            None => None,
        };

        let provider = OidcProvider::new(client_id, client_secret, self.redirect_url.clone());
        let smart_config = provider.discover(&fhir_base_url).await?;

        let client = Arc::new(FhirClient::new(
            provider,
            self.credentials.clone(),
            self.api_calls.clone(),
            fhir_base_url,
            smart_config,
        ));

        self.cache.insert(tenant.id, client.clone());
        Ok(client)
    }
}
