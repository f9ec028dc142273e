//! §9 Design Notes: "Global singletons -> explicit context". Every core operation in
//! this crate takes a `Context` by reference instead of reaching for an ambient
//! current-user/database handle the way the source's Flask app does via
//! `current_app`/`flask_login.current_user` — §9 open question 3 forbids that pattern
//! in background workers outright.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::domain::entities::healthprep::{PhiLoggingLevel, Tenant};
use shared::domain::repositories::healthprep::ProviderScope;

/// The effective role a `Principal` acts with (§3 "User").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    RootAdmin,
    Admin,
    Nurse,
    Staff,
    Practitioner,
}

impl Role {
    /// §4.7: the provider-scope filter is skipped entirely for admins and root admins.
    pub fn bypasses_provider_scope(self) -> bool {
        matches!(self, Role::RootAdmin | Role::Admin)
    }
}

/// The authenticated actor a core operation runs on behalf of.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
    /// Provider ids this principal may act for (§3 "UserProviderAssignment",
    /// §4.7 "accessible_providers"). Empty for root admins, who are tenant-less and
    /// cross tenant boundaries entirely.
    pub accessible_provider_ids: Vec<Uuid>,
}

impl Principal {
    pub fn system() -> Self {
        Self {
            user_id: Uuid::nil(),
            role: Role::RootAdmin,
            accessible_provider_ids: Vec::new(),
        }
    }

    /// §4.7 query-layer helper: `tenant_id = user.tenant` AND, if not admin,
    /// `(provider_id IN accessible_providers OR provider_id IS NULL)`.
    pub fn provider_scope(&self, tenant_id: Uuid) -> ProviderScope {
        if self.role.bypasses_provider_scope() {
            ProviderScope::unrestricted(tenant_id)
        } else {
            ProviderScope::restricted(tenant_id, self.accessible_provider_ids.clone())
        }
    }

    /// §4.7 / §8 property 5: is `provider_id` (possibly absent) within scope for a
    /// non-admin principal.
    pub fn can_access_provider(&self, provider_id: Option<Uuid>) -> bool {
        if self.role.bypasses_provider_scope() {
            return true;
        }
        match provider_id {
            None => true,
            Some(id) => self.accessible_provider_ids.contains(&id),
        }
    }
}

/// Abstracts "now" so the screening engine's date math (§4.1.1 rule 2, §4.1.2) is
/// deterministic under test and doesn't read the system clock in business logic.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    /// Age/eligibility/status math runs in the tenant's civil timezone (default UTC,
    /// §4.1.1 rule 2); for now every tenant observes UTC so this is `now().date_naive()`.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A fixed clock for deterministic tests (§A.7).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Threaded into every screening-engine / EMR-sync / prep-sheet / audit operation.
/// `DB` and `Logger` are represented implicitly: repositories are injected directly into
/// each use case (the teacher's dependency-injection style) and `tracing` is a global
/// subscriber, so this struct carries only the pieces that are genuinely per-call state.
#[derive(Clone)]
pub struct Context {
    pub tenant: Tenant,
    pub principal: Principal,
    pub clock: std::sync::Arc<dyn Clock>,
}

impl Context {
    pub fn new(tenant: Tenant, principal: Principal, clock: std::sync::Arc<dyn Clock>) -> Self {
        Self {
            tenant,
            principal,
            clock,
        }
    }

    pub fn system(tenant: Tenant) -> Self {
        Self::new(tenant, Principal::system(), std::sync::Arc::new(SystemClock))
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant.id
    }

    pub fn provider_scope(&self) -> ProviderScope {
        self.principal.provider_scope(self.tenant.id)
    }

    /// §4.7: PHI is hashed unless the tenant opted into `detailed` logging.
    pub fn should_hash_phi(&self) -> bool {
        !matches!(self.tenant.phi_logging_level, PhiLoggingLevel::Detailed)
    }
}
