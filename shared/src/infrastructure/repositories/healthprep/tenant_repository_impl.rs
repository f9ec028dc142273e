use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{EpicEnvironment, PhiLoggingLevel, Tenant, TenantStatus};
use crate::domain::repositories::healthprep::TenantRepository;
use crate::infrastructure::database::queries::healthprep::tenant::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

/// Flat column shape sqlx can bind `FromRow` against; `caps`/`document_cutoffs`/
/// `phi_filter_settings` round-trip through JSONB since they're value objects with no
/// query of their own (§9 Design Notes: no caller ever filters on a single cap).
#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    name: String,
    display_name: String,
    epic_environment: EpicEnvironment,
    epic_client_id: Option<String>,
    epic_client_secret_encrypted: Option<Vec<u8>>,
    fhir_base_url: Option<String>,
    oauth: serde_json::Value,
    caps: serde_json::Value,
    document_cutoffs: serde_json::Value,
    phi_filter_settings: serde_json::Value,
    phi_logging_level: PhiLoggingLevel,
    write_back_dry_run: bool,
    status: TenantStatus,
    last_sync_at: Option<DateTime<Utc>>,
    request_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_by: Option<Uuid>,
    system_id: Option<String>,
    version: i64,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            display_name: row.display_name,
            epic_environment: row.epic_environment,
            epic_client_id: row.epic_client_id,
            epic_client_secret_encrypted: row.epic_client_secret_encrypted,
            fhir_base_url: row.fhir_base_url,
            oauth: serde_json::from_value(row.oauth).unwrap_or_default(),
            caps: serde_json::from_value(row.caps).unwrap_or_default(),
            document_cutoffs: serde_json::from_value(row.document_cutoffs).unwrap_or_default(),
            phi_filter_settings: serde_json::from_value(row.phi_filter_settings).unwrap_or_default(),
            phi_logging_level: row.phi_logging_level,
            write_back_dry_run: row.write_back_dry_run,
            status: row.status,
            last_sync_at: row.last_sync_at,
            request_id: row.request_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
            system_id: row.system_id,
            version: row.version,
        }
    }
}

pub struct TenantRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl TenantRepositoryImpl {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self {
            database_service: Arc::new(DatabaseService::new(pool)),
        }
    }

    pub fn from_service(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl TenantRepository for TenantRepositoryImpl {
    async fn create(&self, tenant: Tenant) -> AppResult<Tenant> {
        let oauth = serde_json::to_value(&tenant.oauth).map_err(|e| AppError::Internal(e.to_string()))?;
        let caps = serde_json::to_value(tenant.caps).map_err(|e| AppError::Internal(e.to_string()))?;
        let document_cutoffs = serde_json::to_value(tenant.document_cutoffs)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let phi_filter_settings = serde_json::to_value(tenant.phi_filter_settings)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query_as::<_, TenantRow>(TENANT_INSERT)
            .bind(tenant.id)
            .bind(tenant.name)
            .bind(tenant.display_name)
            .bind(tenant.epic_environment)
            .bind(tenant.epic_client_id)
            .bind(tenant.epic_client_secret_encrypted)
            .bind(tenant.fhir_base_url)
            .bind(oauth)
            .bind(caps)
            .bind(document_cutoffs)
            .bind(phi_filter_settings)
            .bind(tenant.phi_logging_level)
            .bind(tenant.write_back_dry_run)
            .bind(tenant.status)
            .bind(tenant.last_sync_at)
            .bind(tenant.request_id)
            .bind(tenant.created_at)
            .bind(tenant.updated_at)
            .bind(tenant.created_by)
            .bind(tenant.updated_by)
            .bind(tenant.system_id)
            .bind(tenant.version)
            .fetch_one(self.database_service.pool())
            .await
            .map(Tenant::from)
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, TenantRow>(TENANT_FIND_BY_ID)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Tenant::from))
            .map_err(AppError::Database)
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Tenant>> {
        sqlx::query_as::<_, TenantRow>(TENANT_FIND_BY_NAME)
            .bind(name)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Tenant::from))
            .map_err(AppError::Database)
    }

    async fn update(&self, mut tenant: Tenant) -> AppResult<Tenant> {
        let current_version = tenant.version;
        tenant.version += 1;
        let oauth = serde_json::to_value(&tenant.oauth).map_err(|e| AppError::Internal(e.to_string()))?;
        let caps = serde_json::to_value(tenant.caps).map_err(|e| AppError::Internal(e.to_string()))?;
        let document_cutoffs = serde_json::to_value(tenant.document_cutoffs)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let phi_filter_settings = serde_json::to_value(tenant.phi_filter_settings)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        sqlx::query_as::<_, TenantRow>(TENANT_UPDATE)
            .bind(tenant.id)
            .bind(tenant.name)
            .bind(tenant.display_name)
            .bind(tenant.epic_environment)
            .bind(tenant.epic_client_id)
            .bind(tenant.epic_client_secret_encrypted)
            .bind(tenant.fhir_base_url)
            .bind(oauth)
            .bind(caps)
            .bind(document_cutoffs)
            .bind(phi_filter_settings)
            .bind(tenant.phi_logging_level)
            .bind(tenant.write_back_dry_run)
            .bind(tenant.status)
            .bind(tenant.last_sync_at)
            .bind(tenant.updated_at)
            .bind(tenant.updated_by)
            .bind(tenant.version)
            .bind(current_version)
            .fetch_one(self.database_service.pool())
            .await
            .map(Tenant::from)
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query(TENANT_DELETE)
            .bind(id)
            .execute(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list(&self, limit: u32, offset: u32) -> AppResult<Vec<Tenant>> {
        sqlx::query_as::<_, TenantRow>(TENANT_LIST)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(Tenant::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_pending_approval(&self) -> AppResult<Vec<Tenant>> {
        sqlx::query_as::<_, TenantRow>(TENANT_LIST_PENDING_APPROVAL)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(Tenant::from).collect())
            .map_err(AppError::Database)
    }
}
