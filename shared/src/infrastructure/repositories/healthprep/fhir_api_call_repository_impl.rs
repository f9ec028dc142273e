use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::FhirApiCall;
use crate::domain::repositories::healthprep::FhirApiCallRepository;
use crate::infrastructure::database::queries::healthprep::fhir_api_call::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct FhirApiCallRow {
    id: Uuid,
    tenant_id: Uuid,
    provider_id: Option<Uuid>,
    endpoint: String,
    method: String,
    resource_type: String,
    response_status: Option<i32>,
    response_time_ms: Option<i64>,
    called_at: DateTime<Utc>,
}

impl From<FhirApiCallRow> for FhirApiCall {
    fn from(row: FhirApiCallRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            provider_id: row.provider_id,
            endpoint: row.endpoint,
            method: row.method,
            resource_type: row.resource_type,
            response_status: row.response_status,
            response_time_ms: row.response_time_ms,
            called_at: row.called_at,
        }
    }
}

pub struct FhirApiCallRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl FhirApiCallRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl FhirApiCallRepository for FhirApiCallRepositoryImpl {
    async fn record(&self, call: FhirApiCall) -> AppResult<FhirApiCall> {
        sqlx::query_as::<_, FhirApiCallRow>(FHIR_API_CALL_INSERT)
            .bind(call.id)
            .bind(call.tenant_id)
            .bind(call.provider_id)
            .bind(call.endpoint)
            .bind(call.method)
            .bind(call.resource_type)
            .bind(call.response_status)
            .bind(call.response_time_ms)
            .bind(call.called_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(FhirApiCall::from)
            .map_err(AppError::Database)
    }

    async fn count_since(&self, tenant_id: Uuid, since: DateTime<Utc>) -> AppResult<i64> {
        let (count,): (i64,) = sqlx::query_as(FHIR_API_CALL_COUNT_SINCE)
            .bind(tenant_id)
            .bind(since)
            .fetch_one(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(count)
    }
}
