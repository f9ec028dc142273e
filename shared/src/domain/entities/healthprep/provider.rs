use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::AuditFields;

/// Per-provider OAuth2 session state (§4.3). Providers carry their own tokens because
/// v2 SMART-on-FHIR authorizations are per-clinician (`fhirUser = Practitioner/…`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderOAuthState {
    pub access_token_encrypted: Option<Vec<u8>>,
    pub refresh_token_encrypted: Option<Vec<u8>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scopes: Vec<String>,
    pub fhir_user_practitioner_id: Option<String>,
}

impl ProviderOAuthState {
    /// §4.3 invariant: a request may be made only when a token exists and is either
    /// still valid or refreshable.
    pub fn has_usable_token(&self, now: DateTime<Utc>) -> bool {
        self.access_token_encrypted.is_some()
            && (self.expires_at.map(|exp| exp > now).unwrap_or(false)
                || self.refresh_token_encrypted.is_some())
    }

    /// §4.3 "scope change detection": callers compare the requested scope set against
    /// `scopes` before starting a new authorization flow and fully clear this state
    /// (rather than merge) when it differs.
    pub fn scopes_differ(&self, requested: &[String]) -> bool {
        let mut current: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        let mut wanted: Vec<&str> = requested.iter().map(String::as_str).collect();
        current.sort_unstable();
        wanted.sort_unstable();
        current != wanted
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A clinician (§3 "Provider").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
    pub epic_practitioner_id: Option<String>,
    pub oauth: ProviderOAuthState,
    pub active: bool,

    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub system_id: Option<String>,
    pub version: i64,
}

impl Provider {
    pub fn new(tenant_id: Uuid, name: String) -> Self {
        let audit = AuditFields::new();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            specialty: None,
            epic_practitioner_id: None,
            oauth: ProviderOAuthState::default(),
            active: true,
            request_id: audit.request_id,
            created_at: audit.created_at,
            updated_at: audit.updated_at,
            created_by: audit.created_by,
            updated_by: audit.updated_by,
            system_id: audit.system_id,
            version: audit.version,
        }
    }
}

/// Per-row capability flags on a user↔provider assignment (§3 "UserProviderAssignment").
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ProviderCapabilities {
    pub view_patients: bool,
    pub edit_screenings: bool,
    pub generate_prep_sheets: bool,
    pub sync_epic: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProviderAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider_id: Uuid,
    pub capabilities: ProviderCapabilities,
    pub created_at: DateTime<Utc>,
}

impl UserProviderAssignment {
    pub fn new(user_id: Uuid, provider_id: Uuid, capabilities: ProviderCapabilities) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            provider_id,
            capabilities,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_change_detection_ignores_order() {
        let mut state = ProviderOAuthState {
            scopes: vec!["patient/*.read".into(), "launch".into()],
            ..Default::default()
        };
        assert!(!state.scopes_differ(&["launch".into(), "patient/*.read".into()]));
        assert!(state.scopes_differ(&["patient/*.write".into()]));

        state.clear();
        assert!(state.scopes.is_empty());
        assert!(!state.has_usable_token(Utc::now()));
    }
}
