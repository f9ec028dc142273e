//! §4.3 "OAuth2 Token Manager (FHIR Client)" — the request-issuing client built on top
//! of `OidcProvider`'s token exchange/refresh primitives, adding the token-store
//! critical section, rate limiting (§4.2/§5), and the fail-closed provider/tenant
//! credential boundary.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use shared::domain::entities::healthprep::FhirApiCall;
use shared::domain::repositories::healthprep::FhirApiCallRepository;
use shared::shared::{AppError, AppResult};

use super::provider::{FhirTokenSet, OidcProvider, SmartConfiguration};

/// §4.3: "the client is either tenant-scoped or provider-scoped." This is the only
/// key a `FhirClient` call site can address credentials by — there is no "fall back
/// to tenant" path, so a provider-scoped caller that passes `Provider` can never
/// silently read tenant credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialScope {
    Tenant(Uuid),
    Provider(Uuid),
}

#[derive(Debug, Clone)]
pub struct FhirCredentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub scopes: Vec<String>,
}

impl From<FhirTokenSet> for FhirCredentials {
    fn from(tokens: FhirTokenSet) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_at,
            scopes: tokens.scopes,
        }
    }
}

/// Persists decrypted credentials for a scope. Encryption of the stored secret is an
/// infrastructure concern (the workspace `DekManager`) that sits behind this trait's
/// implementation, not in this crate.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self, scope: CredentialScope) -> AppResult<Option<FhirCredentials>>;
    async fn save(&self, scope: CredentialScope, credentials: FhirCredentials) -> AppResult<()>;
    async fn clear(&self, scope: CredentialScope) -> AppResult<()>;
}

/// §5 "the token store per provider/tenant is a critical section: refresh uses a
/// mutex keyed by (tenant_id, provider_id)". Keyed directly off `CredentialScope`
/// since that already distinguishes the two cases.
struct RefreshLocks {
    locks: DashMap<CredentialScope, Arc<AsyncMutex<()>>>,
}

impl RefreshLocks {
    fn new() -> Self {
        Self { locks: DashMap::new() }
    }

    fn lock_for(&self, scope: CredentialScope) -> Arc<AsyncMutex<()>> {
        self.locks.entry(scope).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }
}

pub struct FhirClient {
    provider: OidcProvider,
    credentials: Arc<dyn CredentialStore>,
    api_calls: Arc<dyn FhirApiCallRepository>,
    http: reqwest::Client,
    fhir_base_url: String,
    smart_config: SmartConfiguration,
    refresh_locks: RefreshLocks,
}

impl FhirClient {
    pub fn new(
        provider: OidcProvider,
        credentials: Arc<dyn CredentialStore>,
        api_calls: Arc<dyn FhirApiCallRepository>,
        fhir_base_url: String,
        smart_config: SmartConfiguration,
    ) -> Self {
        Self {
            provider,
            credentials,
            api_calls,
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client builds"),
            fhir_base_url,
            smart_config,
            refresh_locks: RefreshLocks::new(),
        }
    }

    /// §4.2 "rate & concurrency": checked before every dispatched call.
    async fn check_rate_limit(&self, tenant_id: Uuid, hourly_limit: i64) -> AppResult<()> {
        let hour_ago = Utc::now() - chrono::Duration::hours(1);
        let count = self.api_calls.count_since(tenant_id, hour_ago).await?;
        if count >= hourly_limit {
            return Err(AppError::RateLimitExceeded(format!(
                "tenant {tenant_id} has made {count} FHIR calls in the last hour (limit {hourly_limit})"
            )));
        }
        Ok(())
    }

    /// §4.3 invariant: "a request is made only when the access token is non-null AND
    /// (expiry is in the future OR refresh succeeds)." Refresh is serialized per scope
    /// via `refresh_locks` so a burst of requests doesn't thunder-herd the token
    /// endpoint.
    async fn ensure_token(&self, scope: CredentialScope) -> AppResult<String> {
        let stored = self.credentials.load(scope).await?;
        let Some(creds) = stored else {
            return Err(AppError::AuthRequired(
                "no stored FHIR credentials for this scope".to_string(),
            ));
        };

        if creds.expires_at > Utc::now() {
            return Ok(creds.access_token);
        }

        let lock = self.refresh_locks.lock_for(scope);
        let _guard = lock.lock().await;

        // Another task may have refreshed while we waited for the lock.
        if let Some(fresh) = self.credentials.load(scope).await? {
            if fresh.expires_at > Utc::now() {
                return Ok(fresh.access_token);
            }
            let Some(refresh_token) = fresh.refresh_token.clone() else {
                return Err(AppError::ReauthRequired("no refresh token available".to_string()));
            };
            let refreshed: FhirCredentials =
                self.provider.refresh(&self.smart_config, &refresh_token).await?.into();
            self.credentials.save(scope, refreshed.clone()).await?;
            return Ok(refreshed.access_token);
        }

        Err(AppError::AuthRequired("credentials disappeared during refresh".to_string()))
    }

    /// §4.3 "scope change detection": fully clear stored state when the requested
    /// scope set differs from what's stored, before any new authorization flow
    /// begins.
    pub async fn reset_if_scope_changed(&self, scope: CredentialScope, requested: &[String]) -> AppResult<bool> {
        let Some(stored) = self.credentials.load(scope).await? else {
            return Ok(false);
        };
        let mut current = stored.scopes.clone();
        let mut wanted = requested.to_vec();
        current.sort();
        wanted.sort();
        if current != wanted {
            self.credentials.clear(scope).await?;
            return Ok(true);
        }
        Ok(false)
    }

    pub async fn complete_authorization(&self, scope: CredentialScope, code: String) -> AppResult<()> {
        let tokens: FhirCredentials = self.provider.exchange_code(&self.smart_config, code).await?.into();
        self.credentials.save(scope, tokens).await
    }

    /// §6 "GET <resource>?params". `tenant_id` is the rate-limit bucket regardless of
    /// whether `scope` is tenant- or provider-credentialed, since the quota is always
    /// tenant-wide (§4.2).
    pub async fn get(
        &self,
        scope: CredentialScope,
        tenant_id: Uuid,
        hourly_limit: i64,
        resource_path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Value> {
        self.check_rate_limit(tenant_id, hourly_limit).await?;
        self.request(scope, tenant_id, reqwest::Method::GET, resource_path, query, None)
            .await
    }

    /// §4.6 write-back: `POST DocumentReference`.
    pub async fn post(
        &self,
        scope: CredentialScope,
        tenant_id: Uuid,
        hourly_limit: i64,
        resource_path: &str,
        body: Value,
    ) -> AppResult<Value> {
        self.check_rate_limit(tenant_id, hourly_limit).await?;
        self.request(scope, tenant_id, reqwest::Method::POST, resource_path, &[], Some(body))
            .await
    }

    async fn request(
        &self,
        scope: CredentialScope,
        tenant_id: Uuid,
        method: reqwest::Method,
        resource_path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> AppResult<Value> {
        let provider_id = match scope {
            CredentialScope::Provider(id) => Some(id),
            CredentialScope::Tenant(_) => None,
        };
        let resource_type = resource_path.split(['/', '?']).next().unwrap_or(resource_path).to_string();
        let url = format!("{}/{}", self.fhir_base_url.trim_end_matches('/'), resource_path);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let token = self.ensure_token(scope).await?;
            let started = std::time::Instant::now();

            let mut req = self.http.request(method.clone(), &url).bearer_auth(&token);
            if !query.is_empty() {
                req = req.query(query);
            }
            if let Some(payload) = &body {
                req = req.json(payload);
            }

            let response = req
                .send()
                .await
                .map_err(|e| AppError::Transient(format!("FHIR request to {resource_path} failed: {e}")))?;

            let status = response.status();
            let mut call = FhirApiCall::new(
                tenant_id,
                provider_id,
                url.clone(),
                method.as_str().to_string(),
                resource_type.clone(),
            );
            call.response_status = Some(status.as_u16() as i32);
            call.response_time_ms = Some(started.elapsed().as_millis() as i64);
            let _ = self.api_calls.record(call).await;

            if status == reqwest::StatusCode::UNAUTHORIZED {
                // §4.3: "on 401 during a write operation, the client refreshes once
                // and retries once; on second 401 it surfaces reauth_required."
                if attempt >= 2 {
                    return Err(AppError::ReauthRequired(format!(
                        "FHIR endpoint {resource_path} returned 401 after refresh+retry"
                    )));
                }
                self.force_refresh(scope).await?;
                continue;
            }

            if !status.is_success() {
                let body_text = response.text().await.unwrap_or_default();
                return Err(AppError::Permanent(format!(
                    "FHIR endpoint {resource_path} returned {status}: {body_text}"
                )));
            }

            return response
                .json::<Value>()
                .await
                .map_err(|e| AppError::Permanent(format!("malformed FHIR response from {resource_path}: {e}")));
        }
    }

    async fn force_refresh(&self, scope: CredentialScope) -> AppResult<()> {
        let lock = self.refresh_locks.lock_for(scope);
        let _guard = lock.lock().await;
        let Some(stored) = self.credentials.load(scope).await? else {
            return Err(AppError::AuthRequired("no stored FHIR credentials for this scope".to_string()));
        };
        let Some(refresh_token) = stored.refresh_token else {
            return Err(AppError::ReauthRequired("no refresh token available".to_string()));
        };
        let refreshed: FhirCredentials =
            self.provider.refresh(&self.smart_config, &refresh_token).await?.into();
        self.credentials.save(scope, refreshed).await
    }
}

/// §5 "the rate-limit counter is a per-tenant atomic counter reset on the hour
/// boundary" — an in-process fallback for deployments without the database-backed
/// `FhirApiCallRepository` count wired up yet (e.g. early integration tests). The
/// production path is `FhirApiCallRepository::count_since` above.
#[derive(Default)]
pub struct InMemoryHourlyCounters {
    counters: std::sync::Mutex<HashMap<Uuid, (DateTime<Utc>, i64)>>,
}

impl InMemoryHourlyCounters {
    pub fn increment_and_get(&self, tenant_id: Uuid) -> i64 {
        let mut guard = self.counters.lock().unwrap();
        let now = Utc::now();
        let entry = guard.entry(tenant_id).or_insert((now, 0));
        if now - entry.0 > chrono::Duration::hours(1) {
            *entry = (now, 0);
        }
        entry.1 += 1;
        entry.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_hashing_distinguishes_tenant_and_provider() {
        let id = Uuid::new_v4();
        assert_ne!(
            CredentialScope::Tenant(id),
            CredentialScope::Provider(id)
        );
    }

    #[test]
    fn hourly_counter_resets_after_an_hour_boundary() {
        let counters = InMemoryHourlyCounters::default();
        let tenant = Uuid::new_v4();
        assert_eq!(counters.increment_and_get(tenant), 1);
        assert_eq!(counters.increment_and_get(tenant), 2);
    }
}
