//! §4.7 "Audit Log & Provider Scope": a thin façade over `AuditRepository` that
//! enforces the hash-unless-detailed rule for PHI fields and records the
//! cross-provider `security_violation` event this system's API layer relies on.

use std::sync::Arc;

use uuid::Uuid;

use shared::domain::entities::healthprep::{hash_identifier, AuditEntry, AuditEventType, AuditResourceType};
use shared::domain::repositories::healthprep::AuditRepository;
use shared::shared::AppResult;

use crate::context::Context;

/// Either a raw identifier (detailed PHI logging, §3 "Tenant.phi_logging_level") or
/// nothing to record at all; `AuditLogger` decides which based on the tenant setting
/// and the caller never has to remember to hash.
pub enum PhiField<'a> {
    Identifier(&'a str),
    None,
}

pub struct AuditLogger {
    repo: Arc<dyn AuditRepository>,
}

impl AuditLogger {
    pub fn new(repo: Arc<dyn AuditRepository>) -> Self {
        Self { repo }
    }

    /// §4.7: "PHI is stored only in hashed form ... unless the tenant's PHI-logging
    /// level is detailed." `fields` are merged into `data` under their given keys,
    /// hashed via a salt derived from the tenant id (stable across runs, distinct
    /// per tenant) unless `ctx.should_hash_phi()` is false.
    pub async fn record(
        &self,
        ctx: &Context,
        event_type: AuditEventType,
        resource_type: AuditResourceType,
        resource_id: Option<Uuid>,
        fields: &[(&str, PhiField<'_>)],
    ) -> AppResult<AuditEntry> {
        let mut data = serde_json::Map::new();
        let salt = ctx.tenant_id().to_string();
        for (key, value) in fields {
            let rendered = match value {
                PhiField::Identifier(raw) if ctx.should_hash_phi() => {
                    Some(hash_identifier(&salt, raw))
                }
                PhiField::Identifier(raw) => Some((*raw).to_string()),
                PhiField::None => None,
            };
            if let Some(rendered) = rendered {
                data.insert((*key).to_string(), serde_json::Value::String(rendered));
            }
        }

        let entry = AuditEntry::new(
            ctx.tenant_id(),
            Some(ctx.principal.user_id),
            event_type,
            resource_type,
            resource_id,
            serde_json::Value::Object(data),
        );
        self.repo.record(entry).await
    }

    /// §4.7 last sentence: "cross-provider attempts log a `security_violation` event
    /// and return 403." Callers use this from the query-layer boundary when a
    /// requested `provider_id` falls outside `ctx.principal.accessible_provider_ids`.
    pub async fn record_security_violation(
        &self,
        ctx: &Context,
        attempted_provider_id: Uuid,
        resource_type: AuditResourceType,
        resource_id: Option<Uuid>,
    ) -> AppResult<AuditEntry> {
        let entry = AuditEntry::new(
            ctx.tenant_id(),
            Some(ctx.principal.user_id),
            AuditEventType::SecurityViolation,
            resource_type,
            resource_id,
            serde_json::json!({ "attempted_provider_id": attempted_provider_id.to_string() }),
        );
        self.repo.record(entry).await
    }
}

/// §4.7 provider-scope query pattern, expressed as the `WHERE` fragment and bind
/// values a repository implementation appends to a query. Kept here (rather than in
/// each repository) so every healthprep repository applies the identical rule.
pub struct ProviderScopeClause {
    pub sql: &'static str,
}

/// Returns the boolean predicate to AND onto a tenant-scoped query. Implementations
/// bind `tenant_id` and, when not unrestricted, `accessible_provider_ids` positionally
/// after the base query's own parameters.
pub fn provider_scope_clause(scope: &shared::domain::repositories::healthprep::ProviderScope) -> ProviderScopeClause {
    if scope.unrestricted {
        ProviderScopeClause { sql: "tenant_id = $1" }
    } else {
        ProviderScopeClause {
            sql: "tenant_id = $1 AND (provider_id = ANY($2) OR provider_id IS NULL)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shared::domain::entities::healthprep::{EpicEnvironment, Tenant};
    use shared::domain::repositories::healthprep::ProviderScope;
    use std::sync::Mutex;

    struct FakeAuditRepo {
        entries: Mutex<Vec<AuditEntry>>,
    }

    #[async_trait]
    impl AuditRepository for FakeAuditRepo {
        async fn record(&self, entry: AuditEntry) -> AppResult<AuditEntry> {
            self.entries.lock().unwrap().push(entry.clone());
            Ok(entry)
        }
        async fn list_for_tenant(&self, _tenant_id: Uuid, _limit: u32, _offset: u32) -> AppResult<Vec<AuditEntry>> {
            Ok(Vec::new())
        }
        async fn list_for_resource(&self, _resource_id: Uuid) -> AppResult<Vec<AuditEntry>> {
            Ok(Vec::new())
        }
        async fn reparent_tenant_entries(&self, _tenant_id: Uuid) -> AppResult<u64> {
            Ok(0)
        }
    }

    fn test_context() -> Context {
        Context::system(Tenant::new(
            "test-tenant".into(),
            "Test Tenant".into(),
            EpicEnvironment::Sandbox,
        ))
    }

    #[tokio::test]
    async fn hashes_phi_fields_by_default() {
        let repo = Arc::new(FakeAuditRepo { entries: Mutex::new(Vec::new()) });
        let logger = AuditLogger::new(repo.clone());
        let ctx = test_context();
        logger
            .record(
                &ctx,
                AuditEventType::PatientCreated,
                AuditResourceType::Patient,
                None,
                &[("mrn", PhiField::Identifier("MRN-123"))],
            )
            .await
            .unwrap();
        let entries = repo.entries.lock().unwrap();
        let mrn = entries[0].data["mrn"].as_str().unwrap();
        assert_ne!(mrn, "MRN-123");
        assert_eq!(mrn.len(), 64);
    }

    #[test]
    fn unrestricted_scope_skips_provider_predicate() {
        let clause = provider_scope_clause(&ProviderScope::unrestricted(Uuid::new_v4()));
        assert_eq!(clause.sql, "tenant_id = $1");
    }

    #[test]
    fn restricted_scope_includes_provider_predicate() {
        let clause = provider_scope_clause(&ProviderScope::restricted(Uuid::new_v4(), vec![Uuid::new_v4()]));
        assert!(clause.sql.contains("provider_id"));
    }
}
