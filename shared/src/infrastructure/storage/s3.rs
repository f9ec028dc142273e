use crate::infrastructure::storage::storage_trait::Storage;
use crate::shared::AppResult;
use async_trait::async_trait;

pub struct S3Storage {
    // AWS S3 implementation placeholder
}

impl S3Storage {
    pub fn new(_region: &str, _bucket: &str, _access_key: &str, _secret_key: &str) -> Self {
        Self {}
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(&self, _key: &str, _data: &[u8]) -> AppResult<()> {
        Err(crate::shared::AppError::Storage(
            "S3 storage not yet implemented".to_string(),
        ))
    }

    async fn get(&self, _key: &str) -> AppResult<Option<Vec<u8>>> {
        Err(crate::shared::AppError::Storage(
            "S3 storage not yet implemented".to_string(),
        ))
    }

    async fn delete(&self, _key: &str) -> AppResult<()> {
        Err(crate::shared::AppError::Storage(
            "S3 storage not yet implemented".to_string(),
        ))
    }

    async fn list(&self, _prefix: &str) -> AppResult<Vec<String>> {
        Err(crate::shared::AppError::Storage(
            "S3 storage not yet implemented".to_string(),
        ))
    }
}

