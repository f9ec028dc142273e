use jsonwebtoken::jwk::JwkSet;
use shared::shared::{AppError, AppResult};

/// Fetches and caches the EMR issuer's JWKS document, used to verify the signature
/// on a SMART-on-FHIR `id_token` when the launch context includes one.
pub struct Jwks {
    http: reqwest::Client,
}

impl Jwks {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    pub async fn fetch(&self, jwks_uri: &str) -> AppResult<JwkSet> {
        let response = self
            .http
            .get(jwks_uri)
            .send()
            .await
            .map_err(|e| AppError::Transient(format!("JWKS fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Permanent(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AppError::Permanent(format!("Malformed JWKS document: {}", e)))
    }
}

impl Default for Jwks {
    fn default() -> Self {
        Self::new()
    }
}
