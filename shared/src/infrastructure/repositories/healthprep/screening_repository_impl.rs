use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{Screening, ScreeningStatus};
use crate::domain::repositories::healthprep::patient_repository::ProviderScope;
use crate::domain::repositories::healthprep::ScreeningRepository;
use crate::infrastructure::database::queries::healthprep::screening::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct ScreeningRow {
    id: Uuid,
    tenant_id: Uuid,
    patient_id: Uuid,
    screening_type_id: Uuid,
    provider_id: Option<Uuid>,
    status: ScreeningStatus,
    last_completed: Option<NaiveDate>,
    next_due: Option<NaiveDate>,
    is_dormant: bool,
    last_processed: Option<DateTime<Utc>>,
    requires_vaccine_codes: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl ScreeningRow {
    fn into_entity(self, matched_document_ids: Vec<Uuid>) -> Screening {
        Screening {
            id: self.id,
            tenant_id: self.tenant_id,
            patient_id: self.patient_id,
            screening_type_id: self.screening_type_id,
            provider_id: self.provider_id,
            status: self.status,
            last_completed: self.last_completed,
            next_due: self.next_due,
            is_dormant: self.is_dormant,
            last_processed: self.last_processed,
            requires_vaccine_codes: self.requires_vaccine_codes,
            matched_document_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
            version: self.version,
        }
    }
}

pub struct ScreeningRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl ScreeningRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }

    async fn matched_document_ids(&self, screening_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(SCREENING_DOCUMENTS_FOR)
            .bind(screening_id)
            .fetch_all(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn hydrate(&self, row: ScreeningRow) -> AppResult<Screening> {
        let matched = self.matched_document_ids(row.id).await?;
        Ok(row.into_entity(matched))
    }

    async fn hydrate_all(&self, rows: Vec<ScreeningRow>) -> AppResult<Vec<Screening>> {
        let mut screenings = Vec::with_capacity(rows.len());
        for row in rows {
            screenings.push(self.hydrate(row).await?);
        }
        Ok(screenings)
    }
}

#[async_trait]
impl ScreeningRepository for ScreeningRepositoryImpl {
    async fn create(&self, screening: Screening) -> AppResult<Screening> {
        let row = sqlx::query_as::<_, ScreeningRow>(SCREENING_INSERT)
            .bind(screening.id)
            .bind(screening.tenant_id)
            .bind(screening.patient_id)
            .bind(screening.screening_type_id)
            .bind(screening.provider_id)
            .bind(screening.status)
            .bind(screening.last_completed)
            .bind(screening.next_due)
            .bind(screening.is_dormant)
            .bind(screening.last_processed)
            .bind(screening.requires_vaccine_codes)
            .bind(screening.created_at)
            .bind(screening.updated_at)
            .bind(screening.version)
            .fetch_one(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        for document_id in &screening.matched_document_ids {
            self.associate_document(row.id, *document_id).await?;
        }
        self.hydrate(row).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Screening>> {
        let row = sqlx::query_as::<_, ScreeningRow>(SCREENING_FIND_BY_ID)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_for_patient_and_type(
        &self,
        patient_id: Uuid,
        screening_type_id: Uuid,
    ) -> AppResult<Option<Screening>> {
        let row = sqlx::query_as::<_, ScreeningRow>(SCREENING_FIND_FOR_PATIENT_AND_TYPE)
            .bind(patient_id)
            .bind(screening_type_id)
            .fetch_optional(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn update(&self, mut screening: Screening) -> AppResult<Screening> {
        let current_version = screening.version;
        screening.version += 1;
        let row = sqlx::query_as::<_, ScreeningRow>(SCREENING_UPDATE)
            .bind(screening.id)
            .bind(screening.provider_id)
            .bind(screening.status)
            .bind(screening.last_completed)
            .bind(screening.next_due)
            .bind(screening.is_dormant)
            .bind(screening.last_processed)
            .bind(screening.requires_vaccine_codes)
            .bind(screening.updated_at)
            .bind(screening.version)
            .bind(current_version)
            .fetch_one(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        self.hydrate(row).await
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<Screening>> {
        let rows = sqlx::query_as::<_, ScreeningRow>(SCREENING_LIST_FOR_PATIENT)
            .bind(patient_id)
            .fetch_all(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        self.hydrate_all(rows).await
    }

    async fn list_for_scope(
        &self,
        scope: &ProviderScope,
        include_superseded: bool,
    ) -> AppResult<Vec<Screening>> {
        let sql = screening_list_for_scope(scope.unrestricted, include_superseded);
        let query = sqlx::query_as::<_, ScreeningRow>(&sql).bind(scope.tenant_id);
        let rows = if scope.unrestricted {
            query.fetch_all(self.database_service.pool()).await
        } else {
            query
                .bind(&scope.accessible_provider_ids)
                .fetch_all(self.database_service.pool())
                .await
        }
        .map_err(AppError::Database)?;
        self.hydrate_all(rows).await
    }

    async fn associate_document(&self, screening_id: Uuid, document_id: Uuid) -> AppResult<()> {
        sqlx::query(SCREENING_DOCUMENT_ASSOCIATE)
            .bind(screening_id)
            .bind(document_id)
            .execute(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn dissociate_documents(&self, screening_id: Uuid, document_ids: &[Uuid]) -> AppResult<()> {
        sqlx::query(SCREENING_DOCUMENT_DISSOCIATE)
            .bind(screening_id)
            .bind(document_ids)
            .execute(self.database_service.pool())
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
