use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::healthprep::{Appointment, AppointmentStatus};
use crate::domain::repositories::healthprep::AppointmentRepository;
use crate::infrastructure::database::queries::healthprep::appointment::*;
use crate::infrastructure::database::DatabaseService;
use crate::shared::{AppError, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct AppointmentRow {
    id: Uuid,
    tenant_id: Uuid,
    patient_id: Uuid,
    provider_id: Option<Uuid>,
    scheduled_at: DateTime<Utc>,
    appointment_type: String,
    status: AppointmentStatus,
    source_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            patient_id: row.patient_id,
            provider_id: row.provider_id,
            scheduled_at: row.scheduled_at,
            appointment_type: row.appointment_type,
            status: row.status,
            source_id: row.source_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct AppointmentRepositoryImpl {
    database_service: Arc<DatabaseService>,
}

impl AppointmentRepositoryImpl {
    pub fn new(database_service: Arc<DatabaseService>) -> Self {
        Self { database_service }
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentRepositoryImpl {
    async fn upsert_by_source_id(&self, appointment: Appointment) -> AppResult<Appointment> {
        sqlx::query_as::<_, AppointmentRow>(APPOINTMENT_UPSERT_BY_SOURCE_ID)
            .bind(appointment.id)
            .bind(appointment.tenant_id)
            .bind(appointment.patient_id)
            .bind(appointment.provider_id)
            .bind(appointment.scheduled_at)
            .bind(appointment.appointment_type)
            .bind(appointment.status)
            .bind(appointment.source_id)
            .bind(appointment.created_at)
            .bind(appointment.updated_at)
            .fetch_one(self.database_service.pool())
            .await
            .map(Appointment::from)
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Appointment>> {
        sqlx::query_as::<_, AppointmentRow>(APPOINTMENT_FIND_BY_ID)
            .bind(id)
            .fetch_optional(self.database_service.pool())
            .await
            .map(|row| row.map(Appointment::from))
            .map_err(AppError::Database)
    }

    async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<Appointment>> {
        sqlx::query_as::<_, AppointmentRow>(APPOINTMENT_LIST_FOR_PATIENT)
            .bind(patient_id)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(Appointment::from).collect())
            .map_err(AppError::Database)
    }

    async fn list_upcoming_for_tenant(
        &self,
        tenant_id: Uuid,
        window_days: i32,
    ) -> AppResult<Vec<Appointment>> {
        sqlx::query_as::<_, AppointmentRow>(APPOINTMENT_LIST_UPCOMING_FOR_TENANT)
            .bind(tenant_id)
            .bind(window_days)
            .fetch_all(self.database_service.pool())
            .await
            .map(|rows| rows.into_iter().map(Appointment::from).collect())
            .map_err(AppError::Database)
    }
}
