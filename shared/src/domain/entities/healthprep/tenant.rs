use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::healthprep::ProviderOAuthState;
use crate::shared::AuditFields;

/// The system tenant (id `00000000-0000-0000-0000-000000000000`) that audit entries are
/// re-parented to on tenant deletion, and that owns cross-tenant global screening types.
pub const SYSTEM_TENANT_ID: Uuid = Uuid::nil();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "epic_environment", rename_all = "snake_case")]
pub enum EpicEnvironment {
    Sandbox,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "phi_logging_level", rename_all = "snake_case")]
pub enum PhiLoggingLevel {
    Minimal,
    Standard,
    Detailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tenant_status", rename_all = "snake_case")]
pub enum TenantStatus {
    PendingApproval,
    Active,
    Suspended,
    Deleted,
}

/// A tenant caps bundle: the knobs §4.2/§4.5 gate sync and batch behavior on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TenantCaps {
    pub hourly_fhir_call_limit: i32,
    pub max_batch_size: i32,
    pub async_enabled: bool,
    pub prioritization_window_days: i32,
    pub per_job_wall_clock_ceiling_seconds: i64,
}

impl Default for TenantCaps {
    fn default() -> Self {
        Self {
            hourly_fhir_call_limit: 1000,
            max_batch_size: 250,
            async_enabled: true,
            prioritization_window_days: 14,
            per_job_wall_clock_ceiling_seconds: 2 * 60 * 60,
        }
    }
}

/// Per-category document freshness windows consumed by the prep-sheet generator (§4.6).
/// Defaults match the source system's `ChecklistSettings` model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DocumentCutoffs {
    pub lab_cutoff_months: i32,
    pub imaging_cutoff_months: i32,
    pub consult_cutoff_months: i32,
    pub hospital_cutoff_months: i32,
}

impl Default for DocumentCutoffs {
    fn default() -> Self {
        Self {
            lab_cutoff_months: 12,
            imaging_cutoff_months: 24,
            consult_cutoff_months: 12,
            hospital_cutoff_months: 24,
        }
    }
}

/// Per-tenant PHI redaction toggles over the fixed regex library (§4.4). Mirrors the
/// source system's `PHISettings` defaults: every identifier class is filtered except
/// dates of birth, which many clinical displays legitimately need.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhiFilterSettings {
    pub filter_ssn: bool,
    pub filter_phone: bool,
    pub filter_mrn: bool,
    pub filter_addresses: bool,
    pub filter_names: bool,
    pub filter_dates: bool,
}

impl Default for PhiFilterSettings {
    fn default() -> Self {
        Self {
            filter_ssn: true,
            filter_phone: true,
            filter_mrn: true,
            filter_addresses: true,
            filter_names: true,
            filter_dates: false,
        }
    }
}

/// An organization using the system (§3 "Tenant (Organization)").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    pub epic_environment: EpicEnvironment,
    pub epic_client_id: Option<String>,
    /// Encrypted at rest via the workspace `DekManager`; plaintext never leaves the
    /// infrastructure boundary that decrypts it for an outbound Epic call.
    pub epic_client_secret_encrypted: Option<Vec<u8>>,
    pub fhir_base_url: Option<String>,
    /// §4.3 "organization context (legacy)" OAuth session, reusing `ProviderOAuthState`'s
    /// shape since the invariants (usable-token check, scope-change clearing) are
    /// identical regardless of which entity owns the session.
    pub oauth: ProviderOAuthState,
    pub caps: TenantCaps,
    pub document_cutoffs: DocumentCutoffs,
    pub phi_filter_settings: PhiFilterSettings,
    pub phi_logging_level: PhiLoggingLevel,
    pub write_back_dry_run: bool,
    pub status: TenantStatus,
    pub last_sync_at: Option<DateTime<Utc>>,

    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub system_id: Option<String>,
    pub version: i64,
}

impl Tenant {
    pub fn new(name: String, display_name: String, epic_environment: EpicEnvironment) -> Self {
        let audit = AuditFields::new();
        Self {
            id: Uuid::new_v4(),
            name,
            display_name,
            epic_environment,
            epic_client_id: None,
            epic_client_secret_encrypted: None,
            fhir_base_url: None,
            oauth: ProviderOAuthState::default(),
            caps: TenantCaps::default(),
            document_cutoffs: DocumentCutoffs::default(),
            phi_filter_settings: PhiFilterSettings::default(),
            phi_logging_level: PhiLoggingLevel::Minimal,
            write_back_dry_run: true,
            status: TenantStatus::PendingApproval,
            last_sync_at: None,
            request_id: audit.request_id,
            created_at: audit.created_at,
            updated_at: audit.updated_at,
            created_by: audit.created_by,
            updated_by: audit.updated_by,
            system_id: audit.system_id,
            version: audit.version,
        }
    }

    pub fn is_system_tenant(&self) -> bool {
        self.id == SYSTEM_TENANT_ID
    }

    pub fn approve(&mut self, approved_by: Uuid) {
        self.status = TenantStatus::Active;
        self.updated_at = Utc::now();
        self.updated_by = Some(approved_by);
        self.version += 1;
    }

    pub fn suspend(&mut self, suspended_by: Uuid) {
        self.status = TenantStatus::Suspended;
        self.updated_at = Utc::now();
        self.updated_by = Some(suspended_by);
        self.version += 1;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, TenantStatus::Active)
    }
}
