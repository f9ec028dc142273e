use crate::infrastructure::encryption::vault::Vault;
use crate::shared::AppResult;
use async_trait::async_trait;

pub struct AzureKeyVault {
    // Azure Key Vault implementation placeholder
}

impl AzureKeyVault {
    pub fn new(_vault_url: &str, _tenant_id: &str, _client_id: &str, _client_secret: &str) -> Self {
        Self {}
    }
}

#[async_trait]
impl Vault for AzureKeyVault {
    async fn store_dek(&self, _entity_id: &str, _entity_type: &str, _encrypted_dek: &[u8]) -> AppResult<()> {
        Err(crate::shared::AppError::Encryption(
            "Azure Key Vault not yet implemented".to_string(),
        ))
    }

    async fn get_dek(&self, _entity_id: &str, _entity_type: &str) -> AppResult<Option<Vec<u8>>> {
        Err(crate::shared::AppError::Encryption(
            "Azure Key Vault not yet implemented".to_string(),
        ))
    }

    async fn delete_dek(&self, _entity_id: &str, _entity_type: &str) -> AppResult<()> {
        Err(crate::shared::AppError::Encryption(
            "Azure Key Vault not yet implemented".to_string(),
        ))
    }

    async fn rotate_master_key(&self, _new_master_key: &[u8]) -> AppResult<()> {
        Err(crate::shared::AppError::Encryption(
            "Azure Key Vault master key rotation not yet implemented".to_string(),
        ))
    }

    async fn store_master_key(&self, _master_key: &[u8]) -> AppResult<()> {
        Err(crate::shared::AppError::Encryption(
            "Azure Key Vault not yet implemented".to_string(),
        ))
    }

    async fn get_master_key(&self) -> AppResult<Option<Vec<u8>>> {
        Err(crate::shared::AppError::Encryption(
            "Azure Key Vault not yet implemented".to_string(),
        ))
    }
}

