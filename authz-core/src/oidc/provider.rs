use chrono::{DateTime, Utc};
use oauth2::{ClientId, ClientSecret, Scope};
use serde::{Deserialize, Serialize};
use shared::shared::{AppError, AppResult};

/// Epic's `/.well-known/smart-configuration` document (§4.3 "discovery from the
/// issuer's `/.well-known/smart-configuration`").
#[derive(Debug, Clone, Deserialize)]
pub struct SmartConfiguration {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
}

/// Resolved token state returned to the caller after an exchange or refresh. The
/// caller is responsible for encrypting and persisting this into the tenant's or
/// provider's `ProviderOAuthState` — this type never touches a repository itself.
#[derive(Debug, Clone, Serialize)]
pub struct FhirTokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub scopes: Vec<String>,
}

/// The FHIR OAuth2 client (§4.3). One instance per tenant's Epic registration;
/// provider-scoped vs tenant-scoped is a property of which stored credential the
/// caller feeds into `exchange_code`/`refresh`, not of this type.
pub struct OidcProvider {
    client_id: ClientId,
    client_secret: Option<ClientSecret>,
    redirect_url: String,
    http: reqwest::Client,
}

impl OidcProvider {
    pub fn new(client_id: String, client_secret: Option<String>, redirect_url: String) -> Self {
        Self {
            client_id: ClientId::new(client_id),
            client_secret: client_secret.map(ClientSecret::new),
            redirect_url,
            http: reqwest::Client::new(),
        }
    }

    /// Fetches and parses the issuer's SMART configuration document.
    pub async fn discover(&self, fhir_base_url: &str) -> AppResult<SmartConfiguration> {
        let url = format!(
            "{}/.well-known/smart-configuration",
            fhir_base_url.trim_end_matches('/')
        );
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Transient(format!("SMART discovery request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Permanent(format!(
                "SMART discovery returned {}",
                response.status()
            )));
        }

        response
            .json::<SmartConfiguration>()
            .await
            .map_err(|e| AppError::Permanent(format!("Malformed SMART configuration: {}", e)))
    }

    /// Authorization-code exchange (§4.3 "OAuth2 authorization-code ... flows per
    /// SMART-on-FHIR").
    pub async fn exchange_code(
        &self,
        config: &SmartConfiguration,
        code: String,
    ) -> AppResult<FhirTokenSet> {
        let mut form = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code),
            ("redirect_uri", self.redirect_url.clone()),
            ("client_id", self.client_id.as_str().to_string()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.secret().clone()));
        }

        self.post_token(&config.token_endpoint, &form, AppError::AuthRequired)
            .await
    }

    /// §4.3 invariant: "if a refresh is needed during a batch, token storage ... is
    /// updated atomically before the next request" — this call itself is the atomic
    /// unit; the caller must persist the result before issuing any further request.
    pub async fn refresh(
        &self,
        config: &SmartConfiguration,
        refresh_token: &str,
    ) -> AppResult<FhirTokenSet> {
        let mut form = vec![
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.to_string()),
            ("client_id", self.client_id.as_str().to_string()),
        ];
        if let Some(secret) = &self.client_secret {
            form.push(("client_secret", secret.secret().clone()));
        }

        self.post_token(&config.token_endpoint, &form, AppError::ReauthRequired)
            .await
    }

    async fn post_token(
        &self,
        token_endpoint: &str,
        form: &[(&str, String)],
        on_failure: fn(String) -> AppError,
    ) -> AppResult<FhirTokenSet> {
        let response = self
            .http
            .post(token_endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::Transient(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(on_failure(format!("Token endpoint returned {}: {}", status, body)));
        }

        let parsed: TokenEndpointResponse = response
            .json()
            .await
            .map_err(|e| AppError::Permanent(format!("Malformed token response: {}", e)))?;

        Ok(FhirTokenSet {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token,
            expires_at: Utc::now() + chrono::Duration::seconds(parsed.expires_in.unwrap_or(3600)),
            scopes: parsed
                .scope
                .map(|s| s.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }

    pub fn authorization_scopes(scopes: &[&str]) -> Vec<Scope> {
        scopes.iter().map(|s| Scope::new(s.to_string())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_scopes_wraps_strings() {
        let scopes = OidcProvider::authorization_scopes(&["launch", "patient/*.read"]);
        assert_eq!(scopes.len(), 2);
        assert_eq!(scopes[0].as_str(), "launch");
    }
}
