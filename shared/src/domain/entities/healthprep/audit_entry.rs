use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::tenant::SYSTEM_TENANT_ID;

/// §4.7: every state-changing operation writes exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_event_type", rename_all = "snake_case")]
pub enum AuditEventType {
    PatientCreated,
    PatientUpdated,
    DocumentProcessed,
    ScreeningUpdated,
    EpicSync,
    EpicDocumentWrite,
    JobEnqueued,
    JobCancelled,
    SecurityViolation,
    AccountLockout,
    BruteForceDetected,
    PhiFilterFailed,
    TenantDeleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "audit_resource_type", rename_all = "snake_case")]
pub enum AuditResourceType {
    Tenant,
    Patient,
    Document,
    Screening,
    ScreeningType,
    AsyncJob,
    Provider,
    Session,
}

/// §3 "AuditEntry". Append-only; tenant id is always present (system tenant 0 for
/// root-admin actions and for entries re-parented after tenant deletion, §3 "Tenant").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Option<Uuid>,
    pub event_type: AuditEventType,
    pub resource_type: AuditResourceType,
    pub resource_id: Option<Uuid>,
    /// PHI is stored only in hashed form here unless the tenant's PHI-logging level is
    /// `detailed` — enforced by `AuditEntry::new` callers via `hash_identifier`, never
    /// by this struct holding raw PHI itself.
    pub data: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub session_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        tenant_id: Uuid,
        user_id: Option<Uuid>,
        event_type: AuditEventType,
        resource_type: AuditResourceType,
        resource_id: Option<Uuid>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            user_id,
            event_type,
            resource_type,
            resource_id,
            data,
            ip_address: None,
            user_agent: None,
            session_id: None,
            occurred_at: Utc::now(),
        }
    }

    /// Re-parent to the system tenant on tenant deletion (§3 "Deletion is cascade
    /// across tenant-scoped entities; audit entries are re-parented to the system
    /// tenant rather than deleted").
    pub fn reparent_to_system_tenant(&mut self) {
        self.tenant_id = SYSTEM_TENANT_ID;
    }
}

/// SHA-256 identifier hash with a process-level salt (§4.7, §8 property 7). Two
/// audit entries for the same patient in `minimal`/`standard` logging mode must hash
/// identically; two different patients must not collide beyond the hash's own
/// collision bound.
pub fn hash_identifier(salt: &str, identifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(identifier.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_identifier_same_salt_hashes_equal() {
        let a = hash_identifier("tenant-salt", "patient-123");
        let b = hash_identifier("tenant-salt", "patient-123");
        assert_eq!(a, b);
    }

    #[test]
    fn different_identifiers_hash_differently() {
        let a = hash_identifier("tenant-salt", "patient-123");
        let b = hash_identifier("tenant-salt", "patient-456");
        assert_ne!(a, b);
    }

    #[test]
    fn reparenting_moves_to_system_tenant() {
        let mut entry = AuditEntry::new(
            Uuid::new_v4(),
            None,
            AuditEventType::TenantDeleted,
            AuditResourceType::Tenant,
            None,
            serde_json::json!({}),
        );
        entry.reparent_to_system_tenant();
        assert_eq!(entry.tenant_id, SYSTEM_TENANT_ID);
    }
}
