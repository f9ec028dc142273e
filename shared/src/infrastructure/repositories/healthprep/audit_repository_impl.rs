use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{AuditEntry, AuditEventType, AuditResourceType, SYSTEM_TENANT_ID};
use crate::domain::repositories::healthprep::AuditRepository;
use crate::infrastructure::database::queries::healthprep::audit::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct AuditEntryRow {
    id: Uuid,
    tenant_id: Uuid,
    user_id: Option<Uuid>,
    event_type: AuditEventType,
    resource_type: AuditResourceType,
    resource_id: Option<Uuid>,
    data: serde_json::Value,
    ip_address: Option<String>,
    user_agent: Option<String>,
    session_id: Option<Uuid>,
    occurred_at: DateTime<Utc>,
}

impl From<AuditEntryRow> for AuditEntry {
    fn from(row: AuditEntryRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            user_id: row.user_id,
            event_type: row.event_type,
            resource_type: row.resource_type,
            resource_id: row.resource_id,
            data: row.data,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            session_id: row.session_id,
            occurred_at: row.occurred_at,
        }
    }
}

pub struct AuditRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl AuditRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl AuditRepository for AuditRepositoryImpl {
    async fn record(&self, entry: AuditEntry) -> AppResult<AuditEntry> {
        sqlx::query_as::<_, AuditEntryRow>(AUDIT_ENTRY_INSERT)
            .bind(entry.id)
            .bind(entry.tenant_id)
            .bind(entry.user_id)
            .bind(entry.event_type)
            .bind(entry.resource_type)
            .bind(entry.resource_id)
            .bind(entry.data)
            .bind(entry.ip_address)
            .bind(entry.user_agent)
            .bind(entry.session_id)
            .bind(entry.occurred_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(AuditEntry::from)
            .map_err(AppError::Database)
    }

    async fn list_for_tenant(&self, tenant_id: Uuid, limit: u32, offset: u32) -> AppResult<Vec<AuditEntry>> {
        sqlx::query_as::<_, AuditEntryRow>(AUDIT_ENTRY_LIST_FOR_TENANT)
            .bind(tenant_id)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(AuditEntry::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_for_resource(&self, resource_id: Uuid) -> AppResult<Vec<AuditEntry>> {
        sqlx::query_as::<_, AuditEntryRow>(AUDIT_ENTRY_LIST_FOR_RESOURCE)
            .bind(resource_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(AuditEntry::from).collect())
            .map_err(AppError::Database)
    }

    async fn reparent_tenant_entries(&self, tenant_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(AUDIT_ENTRY_REPARENT_TENANT)
            .bind(tenant_id)
            .bind(SYSTEM_TENANT_ID)
            .execute(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
