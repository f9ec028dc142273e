use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{
    EligibleSexes, Frequency, FrequencyUnit, ScreeningCategory, ScreeningType,
};
use crate::domain::repositories::healthprep::ScreeningTypeRepository;
use crate::infrastructure::database::queries::healthprep::screening_type::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct ScreeningTypeRow {
    id: Uuid,
    tenant_id: Option<Uuid>,
    name: String,
    keywords: Vec<String>,
    eligible_sexes: EligibleSexes,
    min_age: Option<i32>,
    max_age: Option<i32>,
    frequency_value: i32,
    frequency_unit: FrequencyUnit,
    trigger_conditions: Vec<String>,
    screening_category: ScreeningCategory,
    variant_of: Option<Uuid>,
    is_immunization_based: bool,
    cvx_codes: Vec<String>,
    active: bool,
    criteria_signature: String,
    criteria_last_changed_at: DateTime<Utc>,
    request_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_by: Option<Uuid>,
    system_id: Option<String>,
    version: i64,
}

impl From<ScreeningTypeRow> for ScreeningType {
    fn from(row: ScreeningTypeRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            name: row.name,
            keywords: row.keywords,
            eligible_sexes: row.eligible_sexes,
            min_age: row.min_age,
            max_age: row.max_age,
            frequency: Frequency {
                value: row.frequency_value,
                unit: row.frequency_unit,
            },
            trigger_conditions: row.trigger_conditions,
            screening_category: row.screening_category,
            variant_of: row.variant_of,
            is_immunization_based: row.is_immunization_based,
            cvx_codes: row.cvx_codes,
            active: row.active,
            criteria_signature: row.criteria_signature,
            criteria_last_changed_at: row.criteria_last_changed_at,
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

pub struct ScreeningTypeRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl ScreeningTypeRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl ScreeningTypeRepository for ScreeningTypeRepositoryImpl {
    async fn create(&self, screening_type: ScreeningType) -> AppResult<ScreeningType> {
        sqlx::query_as::<_, ScreeningTypeRow>(SCREENING_TYPE_INSERT)
            .bind(screening_type.id)
            .bind(screening_type.tenant_id)
            .bind(screening_type.name)
            .bind(screening_type.keywords)
            .bind(screening_type.eligible_sexes)
            .bind(screening_type.min_age)
            .bind(screening_type.max_age)
            .bind(screening_type.frequency.value)
            .bind(screening_type.frequency.unit)
            .bind(screening_type.trigger_conditions)
            .bind(screening_type.screening_category)
            .bind(screening_type.variant_of)
            .bind(screening_type.is_immunization_based)
            .bind(screening_type.cvx_codes)
            .bind(screening_type.active)
            .bind(screening_type.criteria_signature)
            .bind(screening_type.criteria_last_changed_at)
            .bind(screening_type.request_id)
            .bind(screening_type.created_at)
            .bind(screening_type.updated_at)
            .bind(screening_type.created_by)
            .bind(screening_type.updated_by)
            .bind(screening_type.system_id)
            .bind(screening_type.version)
            .fetch_one(self.database_service.pool())
            .await
            .map(ScreeningType::from)
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ScreeningType>> {
        sqlx::query_as::<_, ScreeningTypeRow>(SCREENING_TYPE_FIND_BY_ID)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(ScreeningType::from))
            .map_err(AppError::Database)
    }

    async fn update(&self, mut screening_type: ScreeningType) -> AppResult<ScreeningType> {
        let current_version = screening_type.version;
        screening_type.version += 1;
        sqlx::query_as::<_, ScreeningTypeRow>(SCREENING_TYPE_UPDATE)
            .bind(screening_type.id)
            .bind(screening_type.name)
            .bind(screening_type.keywords)
            .bind(screening_type.eligible_sexes)
            .bind(screening_type.min_age)
            .bind(screening_type.max_age)
            .bind(screening_type.frequency.value)
            .bind(screening_type.frequency.unit)
            .bind(screening_type.trigger_conditions)
            .bind(screening_type.screening_category)
            .bind(screening_type.variant_of)
            .bind(screening_type.is_immunization_based)
            .bind(screening_type.cvx_codes)
            .bind(screening_type.active)
            .bind(screening_type.criteria_signature)
            .bind(screening_type.criteria_last_changed_at)
            .bind(screening_type.updated_at)
            .bind(screening_type.updated_by)
            .bind(screening_type.version)
            .bind(current_version)
            .fetch_one(self.database_service.pool())
            .await
            .map(ScreeningType::from)
            .map_err(AppError::Database)
    }

    async fn list_visible_to_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ScreeningType>> {
        sqlx::query_as::<_, ScreeningTypeRow>(SCREENING_TYPE_LIST_VISIBLE_TO_TENANT)
            .bind(tenant_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(ScreeningType::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_active_visible_to_tenant(&self, tenant_id: Uuid) -> AppResult<Vec<ScreeningType>> {
        sqlx::query_as::<_, ScreeningTypeRow>(SCREENING_TYPE_LIST_ACTIVE_VISIBLE_TO_TENANT)
            .bind(tenant_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(ScreeningType::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_variants_of(&self, base_type_id: Uuid) -> AppResult<Vec<ScreeningType>> {
        sqlx::query_as::<_, ScreeningTypeRow>(SCREENING_TYPE_LIST_VARIANTS_OF)
            .bind(base_type_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(ScreeningType::from).collect())
            .map_err(AppError::Database)
    }
}
