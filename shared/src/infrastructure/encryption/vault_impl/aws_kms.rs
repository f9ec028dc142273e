use crate::infrastructure::encryption::vault::Vault;
use crate::shared::AppResult;
use async_trait::async_trait;

pub struct AwsKmsVault {
    // AWS KMS implementation would go here
    // For now, placeholder
}

impl AwsKmsVault {
    pub fn new(_region: &str, _key_id: &str) -> Self {
        Self {}
    }
}

#[async_trait]
impl Vault for AwsKmsVault {
    async fn store_dek(&self, _entity_id: &str, _entity_type: &str, _encrypted_dek: &[u8]) -> AppResult<()> {
        // TODO: Implement AWS KMS storage
        Err(crate::shared::AppError::Encryption(
            "AWS KMS vault not yet implemented".to_string(),
        ))
    }

    async fn get_dek(&self, _entity_id: &str, _entity_type: &str) -> AppResult<Option<Vec<u8>>> {
        // TODO: Implement AWS KMS retrieval
        Err(crate::shared::AppError::Encryption(
            "AWS KMS vault not yet implemented".to_string(),
        ))
    }

    async fn delete_dek(&self, _entity_id: &str, _entity_type: &str) -> AppResult<()> {
        // TODO: Implement AWS KMS deletion
        Err(crate::shared::AppError::Encryption(
            "AWS KMS vault not yet implemented".to_string(),
        ))
    }

    async fn rotate_master_key(&self, _new_master_key: &[u8]) -> AppResult<()> {
        Err(crate::shared::AppError::Encryption(
            "AWS KMS master key rotation not yet implemented".to_string(),
        ))
    }

    async fn store_master_key(&self, _master_key: &[u8]) -> AppResult<()> {
        // TODO: Implement AWS KMS master key storage
        Err(crate::shared::AppError::Encryption(
            "AWS KMS vault not yet implemented".to_string(),
        ))
    }

    async fn get_master_key(&self) -> AppResult<Option<Vec<u8>>> {
        // TODO: Implement AWS KMS master key retrieval
        Err(crate::shared::AppError::Encryption(
            "AWS KMS vault not yet implemented".to_string(),
        ))
    }
}

