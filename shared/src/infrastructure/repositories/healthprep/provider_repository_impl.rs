use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{Provider, UserProviderAssignment};
use crate::domain::repositories::healthprep::ProviderRepository;
use crate::infrastructure::database::queries::healthprep::provider::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct ProviderRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    specialty: Option<String>,
    epic_practitioner_id: Option<String>,
    oauth: serde_json::Value,
    active: bool,
    request_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_by: Option<Uuid>,
    system_id: Option<String>,
    version: i64,
}

impl From<ProviderRow> for Provider {
    fn from(row: ProviderRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            specialty: row.specialty,
            epic_practitioner_id: row.epic_practitioner_id,
            oauth: serde_json::from_value(row.oauth).unwrap_or_default(),
            active: row.active,
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

#[derive(Debug, sqlx::FromRow)]
struct UserProviderAssignmentRow {
    id: Uuid,
    user_id: Uuid,
    provider_id: Uuid,
    capabilities: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl From<UserProviderAssignmentRow> for UserProviderAssignment {
    fn from(row: UserProviderAssignmentRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            provider_id: row.provider_id,
            capabilities: serde_json::from_value(row.capabilities).unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

pub struct ProviderRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl ProviderRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl ProviderRepository for ProviderRepositoryImpl {
    async fn create(&self, provider: Provider) -> AppResult<Provider> {
        let oauth = serde_json::to_value(&provider.oauth).map_err(|e| AppError::Internal(e.to_string()))?;
        sqlx::query_as::<_, ProviderRow>(PROVIDER_INSERT)
            .bind(provider.id)
            .bind(provider.tenant_id)
            .bind(provider.name)
            .bind(provider.specialty)
            .bind(provider.epic_practitioner_id)
            .bind(oauth)
            .bind(provider.active)
            .bind(provider.request_id)
            .bind(provider.created_at)
            .bind(provider.updated_at)
            .bind(provider.created_by)
            .bind(provider.updated_by)
            .bind(provider.system_id)
            .bind(provider.version)
            .fetch_one(self.database_service.pool())
            .await
            .map(Provider::from)
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, tenant_id: Uuid, id: Uuid) -> AppResult<Option<Provider>> {
        sqlx::query_as::<_, ProviderRow>(PROVIDER_FIND_BY_ID)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Provider::from))
            .map_err(AppError::Database)
    }

    async fn find_by_id_unscoped(&self, id: Uuid) -> AppResult<Option<Provider>> {
        sqlx::query_as::<_, ProviderRow>(PROVIDER_FIND_BY_ID_UNSCOPED)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Provider::from))
            .map_err(AppError::Database)
    }

    async fn find_by_epic_practitioner_id(
        &self,
        tenant_id: Uuid,
        epic_practitioner_id: &str,
    ) -> AppResult<Option<Provider>> {
        sqlx::query_as::<_, ProviderRow>(PROVIDER_FIND_BY_EPIC_PRACTITIONER_ID)
            .bind(tenant_id)
            .bind(epic_practitioner_id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Provider::from))
            .map_err(AppError::Database)
    }

    async fn update(&self, mut provider: Provider) -> AppResult<Provider> {
        let current_version = provider.version;
        provider.version += 1;
        let oauth = serde_json::to_value(&provider.oauth).map_err(|e| AppError::Internal(e.to_string()))?;
        sqlx::query_as::<_, ProviderRow>(PROVIDER_UPDATE)
            .bind(provider.id)
            .bind(provider.name)
            .bind(provider.specialty)
            .bind(provider.epic_practitioner_id)
            .bind(oauth)
            .bind(provider.active)
            .bind(provider.updated_at)
            .bind(provider.updated_by)
            .bind(provider.version)
            .bind(current_version)
            .fetch_one(self.database_service.pool())
            .await
            .map(Provider::from)
            .map_err(AppError::Database)
    }

    async fn list_for_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<Provider>> {
        sqlx::query_as::<_, ProviderRow>(PROVIDER_LIST_FOR_TENANT)
            .bind(tenant_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(Provider::from).collect())
            .map_err(AppError::Database)
    }

    async fn assign_user(
        &self,
        assignment: UserProviderAssignment,
    ) -> AppResult<UserProviderAssignment> {
        let capabilities = serde_json::to_value(assignment.capabilities)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        sqlx::query_as::<_, UserProviderAssignmentRow>(USER_PROVIDER_ASSIGNMENT_INSERT)
            .bind(assignment.id)
            .bind(assignment.user_id)
            .bind(assignment.provider_id)
            .bind(capabilities)
            .bind(assignment.created_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(UserProviderAssignment::from)
            .map_err(AppError::Database)
    }

    async fn accessible_provider_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(USER_PROVIDER_ASSIGNMENT_ACCESSIBLE_IDS)
            .bind(user_id)
            .fetch_all(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
