//! §6 "`ENCRYPTION_KEY` — symmetric key for encrypting stored secrets (Epic client
//! secrets, OAuth tokens). Absent key disables encryption with a loud warning."
//!
//! Unlike the workspace's `DekManager`/`Vault` hierarchy (per-entity DEKs wrapped by
//! a pluggable KMS backend), stored FHIR credentials are a single symmetric secret
//! per deployment — there is no per-tenant key rotation requirement in scope here, so
//! this store encrypts directly with AES-256-GCM under one process-wide key rather
//! than pulling in the DEK/vault indirection.

use std::sync::Arc;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use uuid::Uuid;

use shared::domain::entities::healthprep::ProviderOAuthState;
use shared::domain::repositories::healthprep::{ProviderRepository, TenantRepository};
use shared::shared::{AppError, AppResult};

use super::client::{CredentialScope, CredentialStore, FhirCredentials};

const ENCRYPTION_KEY_VAR: &str = "ENCRYPTION_KEY";

enum Cipher {
    /// §6 default posture: no key configured means credentials are stored as plain
    /// UTF-8 bytes. A warning is logged once at startup, not on every call.
    Plaintext,
    Aes256Gcm(Aes256Gcm),
}

impl Cipher {
    fn from_env() -> Self {
        match std::env::var(ENCRYPTION_KEY_VAR) {
            Ok(hex_key) => match hex::decode(hex_key.trim()) {
                Ok(bytes) => match Aes256Gcm::new_from_slice(&bytes) {
                    Ok(cipher) => Cipher::Aes256Gcm(cipher),
                    Err(e) => {
                        tracing::warn!("ENCRYPTION_KEY is not a valid 256-bit AES key ({e}); storing FHIR credentials in plaintext");
                        Cipher::Plaintext
                    }
                },
                Err(e) => {
                    tracing::warn!("ENCRYPTION_KEY is not valid hex ({e}); storing FHIR credentials in plaintext");
                    Cipher::Plaintext
                }
            },
            Err(_) => {
                tracing::warn!("ENCRYPTION_KEY is not set; storing FHIR credentials in plaintext");
                Cipher::Plaintext
            }
        }
    }

    /// Nonce-then-ciphertext blob, matching the workspace's other AES-GCM field
    /// encoders (see `shared::infrastructure::encryption::dek_manager`).
    fn seal(&self, plaintext: &[u8]) -> AppResult<Vec<u8>> {
        match self {
            Cipher::Plaintext => Ok(plaintext.to_vec()),
            Cipher::Aes256Gcm(cipher) => {
                let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
                let ciphertext = cipher
                    .encrypt(&nonce, plaintext)
                    .map_err(|e| AppError::Encryption(format!("failed to encrypt FHIR credential: {e}")))?;
                let mut blob = nonce.to_vec();
                blob.extend_from_slice(&ciphertext);
                Ok(blob)
            }
        }
    }

    fn open(&self, blob: &[u8]) -> AppResult<Vec<u8>> {
        match self {
            Cipher::Plaintext => Ok(blob.to_vec()),
            Cipher::Aes256Gcm(cipher) => {
                if blob.len() < 12 {
                    return Err(AppError::Encryption("stored FHIR credential blob is truncated".to_string()));
                }
                let (nonce, ciphertext) = blob.split_at(12);
                cipher
                    .decrypt(Nonce::from_slice(nonce), ciphertext)
                    .map_err(|e| AppError::Encryption(format!("failed to decrypt FHIR credential: {e}")))
            }
        }
    }
}

/// Decrypts a blob sealed under this process's `ENCRYPTION_KEY`, for secrets that
/// live alongside but outside a `CredentialStore`'s own columns — a tenant's Epic
/// client secret, which shares the same at-rest protection but isn't itself an OAuth
/// token pair. See `fhir::factory::FhirClientFactory`.
pub fn decrypt_with_process_key(blob: &[u8]) -> AppResult<Vec<u8>> {
    Cipher::from_env().open(blob)
}

/// `CredentialStore` backed by the `tenants.oauth`/`providers.oauth` columns,
/// encrypting the access/refresh tokens with `ENCRYPTION_KEY` before they reach the
/// database.
pub struct EncryptedCredentialStore {
    tenants: Arc<dyn TenantRepository>,
    providers: Arc<dyn ProviderRepository>,
    cipher: Cipher,
}

impl EncryptedCredentialStore {
    pub fn new(tenants: Arc<dyn TenantRepository>, providers: Arc<dyn ProviderRepository>) -> Self {
        Self { tenants, providers, cipher: Cipher::from_env() }
    }

    fn state_to_credentials(&self, state: &ProviderOAuthState) -> AppResult<Option<FhirCredentials>> {
        let (Some(access_encrypted), Some(expires_at)) = (&state.access_token_encrypted, state.expires_at) else {
            return Ok(None);
        };
        let access_token = String::from_utf8(self.cipher.open(access_encrypted)?)
            .map_err(|e| AppError::Encryption(format!("stored access token is not valid UTF-8: {e}")))?;
        let refresh_token = match &state.refresh_token_encrypted {
            Some(blob) => Some(
                String::from_utf8(self.cipher.open(blob)?)
                    .map_err(|e| AppError::Encryption(format!("stored refresh token is not valid UTF-8: {e}")))?,
            ),
            None => None,
        };
        Ok(Some(FhirCredentials {
            access_token,
            refresh_token,
            expires_at,
            scopes: state.scopes.clone(),
        }))
    }

    fn credentials_to_state(&self, credentials: &FhirCredentials) -> AppResult<ProviderOAuthState> {
        let access_token_encrypted = Some(self.cipher.seal(credentials.access_token.as_bytes())?);
        let refresh_token_encrypted = credentials
            .refresh_token
            .as_ref()
            .map(|token| self.cipher.seal(token.as_bytes()))
            .transpose()?;
        Ok(ProviderOAuthState {
            access_token_encrypted,
            refresh_token_encrypted,
            expires_at: Some(credentials.expires_at),
            scopes: credentials.scopes.clone(),
            fhir_user_practitioner_id: None,
        })
    }

    async fn load_tenant(&self, id: Uuid) -> AppResult<Option<FhirCredentials>> {
        let Some(tenant) = self.tenants.find_by_id(id).await? else {
            return Ok(None);
        };
        self.state_to_credentials(&tenant.oauth)
    }

    async fn save_tenant(&self, id: Uuid, credentials: FhirCredentials) -> AppResult<()> {
        let Some(mut tenant) = self.tenants.find_by_id(id).await? else {
            return Err(AppError::NotFound(format!("tenant {id} not found")));
        };
        tenant.oauth = self.credentials_to_state(&credentials)?;
        self.tenants.update(tenant).await?;
        Ok(())
    }

    async fn clear_tenant(&self, id: Uuid) -> AppResult<()> {
        let Some(mut tenant) = self.tenants.find_by_id(id).await? else {
            return Ok(());
        };
        tenant.oauth.clear();
        self.tenants.update(tenant).await?;
        Ok(())
    }

    async fn load_provider(&self, id: Uuid) -> AppResult<Option<FhirCredentials>> {
        let Some(provider) = self.providers.find_by_id_unscoped(id).await? else {
            return Ok(None);
        };
        self.state_to_credentials(&provider.oauth)
    }

    async fn save_provider(&self, id: Uuid, credentials: FhirCredentials) -> AppResult<()> {
        let Some(mut provider) = self.providers.find_by_id_unscoped(id).await? else {
            return Err(AppError::NotFound(format!("provider {id} not found")));
        };
        provider.oauth = self.credentials_to_state(&credentials)?;
        self.providers.update(provider).await?;
        Ok(())
    }

    async fn clear_provider(&self, id: Uuid) -> AppResult<()> {
        let Some(mut provider) = self.providers.find_by_id_unscoped(id).await? else {
            return Ok(());
        };
        provider.oauth.clear();
        self.providers.update(provider).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CredentialStore for EncryptedCredentialStore {
    async fn load(&self, scope: CredentialScope) -> AppResult<Option<FhirCredentials>> {
        match scope {
            CredentialScope::Tenant(id) => self.load_tenant(id).await,
            CredentialScope::Provider(id) => self.load_provider(id).await,
        }
    }

    async fn save(&self, scope: CredentialScope, credentials: FhirCredentials) -> AppResult<()> {
        match scope {
            CredentialScope::Tenant(id) => self.save_tenant(id, credentials).await,
            CredentialScope::Provider(id) => self.save_provider(id, credentials).await,
        }
    }

    async fn clear(&self, scope: CredentialScope) -> AppResult<()> {
        match scope {
            CredentialScope::Tenant(id) => self.clear_tenant(id).await,
            CredentialScope::Provider(id) => self.clear_provider(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_cipher_round_trips() {
        let cipher = Cipher::Plaintext;
        let sealed = cipher.seal(b"a-token").unwrap();
        assert_eq!(cipher.open(&sealed).unwrap(), b"a-token");
    }

    #[test]
    fn aes_cipher_round_trips_and_blob_is_not_plaintext() {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        let cipher = Cipher::Aes256Gcm(Aes256Gcm::new(&key));
        let sealed = cipher.seal(b"a-refresh-token").unwrap();
        assert_ne!(sealed, b"a-refresh-token");
        assert_eq!(cipher.open(&sealed).unwrap(), b"a-refresh-token");
    }

    #[test]
    fn aes_cipher_rejects_truncated_blob() {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        let cipher = Cipher::Aes256Gcm(Aes256Gcm::new(&key));
        assert!(cipher.open(&[0u8; 4]).is_err());
    }
}
