use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Booked,
    Pending,
    Arrived,
    Completed,
    Cancelled,
}

/// §3 "Appointment".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub appointment_type: String,
    pub status: AppointmentStatus,
    pub source_id: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn new(
        tenant_id: Uuid,
        patient_id: Uuid,
        scheduled_at: DateTime<Utc>,
        appointment_type: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            patient_id,
            provider_id: None,
            scheduled_at,
            appointment_type,
            status: AppointmentStatus::Scheduled,
            source_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// §4.2 step 7: appointments worth upserting during a sync.
    pub fn is_upcoming_and_actionable(&self) -> bool {
        matches!(
            self.status,
            AppointmentStatus::Booked
                | AppointmentStatus::Scheduled
                | AppointmentStatus::Pending
                | AppointmentStatus::Arrived
        )
    }
}
