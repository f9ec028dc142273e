use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{DocumentProcessingStatus, DocumentSource, PatientDocument};
use crate::domain::repositories::healthprep::DocumentRepository;
use crate::infrastructure::database::queries::healthprep::document::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    tenant_id: Uuid,
    patient_id: Uuid,
    source: DocumentSource,
    content_type: String,
    document_date: NaiveDate,
    extracted_text: Option<String>,
    safe_title: String,
    loinc_code: Option<String>,
    category_code: Option<String>,
    source_id: Option<String>,
    processing_status: DocumentProcessingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for PatientDocument {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            patient_id: row.patient_id,
            source: row.source,
            content_type: row.content_type,
            document_date: row.document_date,
            extracted_text: row.extracted_text,
            safe_title: row.safe_title,
            loinc_code: row.loinc_code,
            category_code: row.category_code,
            source_id: row.source_id,
            processing_status: row.processing_status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct DocumentRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl DocumentRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl DocumentRepository for DocumentRepositoryImpl {
    async fn create(&self, document: PatientDocument) -> AppResult<PatientDocument> {
        sqlx::query_as::<_, DocumentRow>(DOCUMENT_INSERT)
            .bind(document.id)
            .bind(document.tenant_id)
            .bind(document.patient_id)
            .bind(document.source)
            .bind(document.content_type)
            .bind(document.document_date)
            .bind(document.extracted_text)
            .bind(document.safe_title)
            .bind(document.loinc_code)
            .bind(document.category_code)
            .bind(document.source_id)
            .bind(document.processing_status)
            .bind(document.created_at)
            .bind(document.updated_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(PatientDocument::from)
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<PatientDocument>> {
        sqlx::query_as::<_, DocumentRow>(DOCUMENT_FIND_BY_ID)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(PatientDocument::from))
            .map_err(AppError::Database)
    }

    async fn find_by_source_id(
        &self,
        tenant_id: Uuid,
        source_id: &str,
    ) -> AppResult<Option<PatientDocument>> {
        sqlx::query_as::<_, DocumentRow>(DOCUMENT_FIND_BY_SOURCE_ID)
            .bind(tenant_id)
            .bind(source_id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(PatientDocument::from))
            .map_err(AppError::Database)
    }

    async fn update(&self, document: PatientDocument) -> AppResult<PatientDocument> {
        sqlx::query_as::<_, DocumentRow>(DOCUMENT_UPDATE)
            .bind(document.id)
            .bind(document.content_type)
            .bind(document.document_date)
            .bind(document.extracted_text)
            .bind(document.safe_title)
            .bind(document.loinc_code)
            .bind(document.category_code)
            .bind(document.source_id)
            .bind(document.processing_status)
            .bind(document.updated_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(PatientDocument::from)
            .map_err(AppError::Database)
    }

    async fn list_for_patient_since(
        &self,
        patient_id: Uuid,
        since: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<PatientDocument>> {
        sqlx::query_as::<_, DocumentRow>(DOCUMENT_LIST_FOR_PATIENT_SINCE)
            .bind(patient_id)
            .bind(since)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(PatientDocument::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<PatientDocument>> {
        sqlx::query_as::<_, DocumentRow>(DOCUMENT_LIST_FOR_PATIENT)
            .bind(patient_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(PatientDocument::from).collect())
            .map_err(AppError::Database)
    }
}
