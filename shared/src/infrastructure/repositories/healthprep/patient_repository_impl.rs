use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{Patient, PatientCondition, Sex};
use crate::domain::repositories::healthprep::{PatientRepository, ProviderScope};
use crate::infrastructure::database::queries::healthprep::patient::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct PatientRow {
    id: Uuid,
    tenant_id: Uuid,
    provider_id: Option<Uuid>,
    mrn: String,
    epic_patient_id: Option<String>,
    name: String,
    date_of_birth: NaiveDate,
    sex: Sex,
    last_fhir_sync: Option<DateTime<Utc>>,
    documents_last_evaluated_at: Option<DateTime<Utc>>,
    request_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<Uuid>,
    updated_by: Option<Uuid>,
    system_id: Option<String>,
    version: i64,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            provider_id: row.provider_id,
            mrn: row.mrn,
            epic_patient_id: row.epic_patient_id,
            name: row.name,
            date_of_birth: row.date_of_birth,
            sex: row.sex,
            last_fhir_sync: row.last_fhir_sync,
            documents_last_evaluated_at: row.documents_last_evaluated_at,
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
struct PatientConditionRow {
    id: Uuid,
    patient_id: Uuid,
    tenant_id: Uuid,
    condition_name: String,
    icd10_code: Option<String>,
    active: bool,
    onset_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PatientConditionRow> for PatientCondition {
    fn from(row: PatientConditionRow) -> Self {
        Self {
            id: row.id,
            patient_id: row.patient_id,
            tenant_id: row.tenant_id,
            condition_name: row.condition_name,
            icd10_code: row.icd10_code,
            active: row.active,
            onset_date: row.onset_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PatientRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl PatientRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl PatientRepository for PatientRepositoryImpl {
    async fn create(&self, patient: Patient) -> AppResult<Patient> {
        sqlx::query_as::<_, PatientRow>(PATIENT_INSERT)
            .bind(patient.id)
            .bind(patient.tenant_id)
            .bind(patient.provider_id)
            .bind(patient.mrn)
            .bind(patient.epic_patient_id)
            .bind(patient.name)
            .bind(patient.date_of_birth)
            .bind(patient.sex)
            .bind(patient.last_fhir_sync)
            .bind(patient.documents_last_evaluated_at)
            .bind(patient.request_id)
            .bind(patient.created_at)
            .bind(patient.updated_at)
            .bind(patient.created_by)
            .bind(patient.updated_by)
            .bind(patient.system_id)
            .bind(patient.version)
            .fetch_one(self.database_service.pool())
            .await
            .map(Patient::from)
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, scope: &ProviderScope, id: Uuid) -> AppResult<Option<Patient>> {
        let sql = patient_find_by_id_scoped(scope.unrestricted);
        let query = sqlx::query_as::<_, PatientRow>(&sql).bind(scope.tenant_id).bind(id);
        let row = if scope.unrestricted {
            query.fetch_optional(self.database_service.pool()).await
        } else {
            query
                .bind(&scope.accessible_provider_ids)
                .fetch_optional(self.database_service.pool())
                .await
        };
        row.map(|r| r.map(Patient::from)).map_err(AppError::Database)
    }

    async fn find_by_mrn(&self, tenant_id: Uuid, mrn: &str) -> AppResult<Option<Patient>> {
        sqlx::query_as::<_, PatientRow>(PATIENT_FIND_BY_MRN)
            .bind(tenant_id)
            .bind(mrn)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Patient::from))
            .map_err(AppError::Database)
    }

    async fn find_by_epic_patient_id(
        &self,
        tenant_id: Uuid,
        epic_patient_id: &str,
    ) -> AppResult<Option<Patient>> {
        sqlx::query_as::<_, PatientRow>(PATIENT_FIND_BY_EPIC_PATIENT_ID)
            .bind(tenant_id)
            .bind(epic_patient_id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Patient::from))
            .map_err(AppError::Database)
    }

    async fn update(&self, mut patient: Patient) -> AppResult<Patient> {
        let current_version = patient.version;
        patient.version += 1;
        sqlx::query_as::<_, PatientRow>(PATIENT_UPDATE)
            .bind(patient.id)
            .bind(patient.provider_id)
            .bind(patient.mrn)
            .bind(patient.epic_patient_id)
            .bind(patient.name)
            .bind(patient.date_of_birth)
            .bind(patient.sex)
            .bind(patient.last_fhir_sync)
            .bind(patient.documents_last_evaluated_at)
            .bind(patient.updated_at)
            .bind(patient.updated_by)
            .bind(patient.version)
            .bind(current_version)
            .fetch_one(self.database_service.pool())
            .await
            .map(Patient::from)
            .map_err(AppError::Database)
    }

    async fn list_for_scope(&self, scope: &ProviderScope) -> AppResult<Vec<Patient>> {
        let sql = patient_list_for_scope(scope.unrestricted);
        let query = sqlx::query_as::<_, PatientRow>(&sql).bind(scope.tenant_id);
        let rows = if scope.unrestricted {
            query.fetch_all(self.database_service.pool()).await
        } else {
            query
                .bind(&scope.accessible_provider_ids)
                .fetch_all(self.database_service.pool())
                .await
        };
        rows.map(|rows| rows.into_iter().map(Patient::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_stale(&self, tenant_id: Uuid, limit: u32) -> AppResult<Vec<Patient>> {
        sqlx::query_as::<_, PatientRow>(PATIENT_LIST_STALE)
            .bind(tenant_id)
            .bind(limit as i64)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(Patient::from).collect())
            .map_err(AppError::Database)
    }

    async fn add_condition(&self, condition: PatientCondition) -> AppResult<PatientCondition> {
        sqlx::query_as::<_, PatientConditionRow>(PATIENT_CONDITION_INSERT)
            .bind(condition.id)
            .bind(condition.patient_id)
            .bind(condition.tenant_id)
            .bind(condition.condition_name)
            .bind(condition.icd10_code)
            .bind(condition.active)
            .bind(condition.onset_date)
            .bind(condition.created_at)
            .bind(condition.updated_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(PatientCondition::from)
            .map_err(AppError::Database)
    }

    async fn update_condition(&self, condition: PatientCondition) -> AppResult<PatientCondition> {
        sqlx::query_as::<_, PatientConditionRow>(PATIENT_CONDITION_UPDATE)
            .bind(condition.id)
            .bind(condition.condition_name)
            .bind(condition.icd10_code)
            .bind(condition.active)
            .bind(condition.onset_date)
            .bind(condition.updated_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(PatientCondition::from)
            .map_err(AppError::Database)
    }

    async fn list_conditions(&self, patient_id: Uuid) -> AppResult<Vec<PatientCondition>> {
        sqlx::query_as::<_, PatientConditionRow>(PATIENT_CONDITION_LIST)
            .bind(patient_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(PatientCondition::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_active_conditions(&self, patient_id: Uuid) -> AppResult<Vec<PatientCondition>> {
        sqlx::query_as::<_, PatientConditionRow>(PATIENT_CONDITION_LIST_ACTIVE)
            .bind(patient_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(PatientCondition::from).collect())
            .map_err(AppError::Database)
    }
}
