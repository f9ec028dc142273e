use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::shared::AuditFields;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "eligible_sexes", rename_all = "snake_case")]
pub enum EligibleSexes {
    Male,
    Female,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "frequency_unit", rename_all = "snake_case")]
pub enum FrequencyUnit {
    Days,
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Frequency {
    pub value: i32,
    pub unit: FrequencyUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "screening_category", rename_all = "snake_case")]
pub enum ScreeningCategory {
    General,
    Conditional,
    RiskBased,
}

/// §3 "ScreeningType". `tenant_id = None` marks a cross-tenant global type (§9 Design
/// Notes open question 4): permitted, authored only by a root admin, and excluded from
/// tenant-deletion cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningType {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub name: String,
    pub keywords: Vec<String>,
    pub eligible_sexes: EligibleSexes,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub frequency: Frequency,
    pub trigger_conditions: Vec<String>,
    pub screening_category: ScreeningCategory,
    /// When this type is a risk-based variant of a base type (§4.1.1 rule 4).
    pub variant_of: Option<Uuid>,
    pub is_immunization_based: bool,
    pub cvx_codes: Vec<String>,
    pub active: bool,
    pub criteria_signature: String,
    pub criteria_last_changed_at: DateTime<Utc>,

    pub request_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub system_id: Option<String>,
    pub version: i64,
}

impl ScreeningType {
    pub fn new(
        tenant_id: Option<Uuid>,
        name: String,
        eligible_sexes: EligibleSexes,
        frequency: Frequency,
        screening_category: ScreeningCategory,
    ) -> Self {
        let audit = AuditFields::new();
        let mut st = Self {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            keywords: Vec::new(),
            eligible_sexes,
            min_age: None,
            max_age: None,
            frequency,
            trigger_conditions: Vec::new(),
            screening_category,
            variant_of: None,
            is_immunization_based: false,
            cvx_codes: Vec::new(),
            active: true,
            criteria_signature: String::new(),
            criteria_last_changed_at: audit.created_at,
            request_id: audit.request_id,
            created_at: audit.created_at,
            updated_at: audit.updated_at,
            created_by: audit.created_by,
            updated_by: audit.updated_by,
            system_id: audit.system_id,
            version: audit.version,
        };
        st.criteria_signature = st.compute_criteria_signature();
        st
    }

    /// §3 "criteria_signature": SHA-256 over the normalised tuple of eligibility +
    /// keywords + frequency + triggers. Cosmetic fields (name, active flag's display
    /// label, audit metadata) are deliberately excluded so renaming a type never forces
    /// a full-tenant reprocess.
    pub fn compute_criteria_signature(&self) -> String {
        let mut keywords = self.keywords.clone();
        keywords.sort_unstable();
        let mut triggers = self.trigger_conditions.clone();
        triggers.sort_unstable();
        let mut cvx = self.cvx_codes.clone();
        cvx.sort_unstable();

        let canonical = format!(
            "sexes={:?}|min={:?}|max={:?}|freq={}:{:?}|category={:?}|variant_of={:?}|keywords={}|triggers={}|imm={}|cvx={}",
            self.eligible_sexes,
            self.min_age,
            self.max_age,
            self.frequency.value,
            self.frequency.unit,
            self.screening_category,
            self.variant_of,
            keywords.join(","),
            triggers.join(","),
            self.is_immunization_based,
            cvx.join(","),
        );

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Recomputes the signature and, iff it actually changed, advances
    /// `criteria_last_changed_at` — the mechanism behind §8 property 2
    /// (selective-refresh liveness) and the "cosmetic edits don't invalidate caches"
    /// rule in §4.1.4.
    pub fn reconcile_signature(&mut self, now: DateTime<Utc>) -> bool {
        let new_signature = self.compute_criteria_signature();
        if new_signature != self.criteria_signature {
            self.criteria_signature = new_signature;
            self.criteria_last_changed_at = now;
            self.updated_at = now;
            self.version += 1;
            true
        } else {
            false
        }
    }

    pub fn requires_vaccine_codes(&self) -> bool {
        self.is_immunization_based && self.cvx_codes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_type() -> ScreeningType {
        ScreeningType::new(
            Some(Uuid::new_v4()),
            "Mammogram".into(),
            EligibleSexes::Female,
            Frequency { value: 1, unit: FrequencyUnit::Years },
            ScreeningCategory::General,
        )
    }

    #[test]
    fn signature_is_stable_across_cosmetic_edits() {
        let mut st = base_type();
        let before = st.criteria_signature.clone();
        st.name = "Mammography Screening".into();
        assert!(!st.reconcile_signature(Utc::now()));
        assert_eq!(st.criteria_signature, before);
    }

    #[test]
    fn signature_changes_when_eligibility_changes() {
        let mut st = base_type();
        let before = st.criteria_signature.clone();
        st.min_age = Some(50);
        let changed_at = Utc::now();
        assert!(st.reconcile_signature(changed_at));
        assert_ne!(st.criteria_signature, before);
        assert_eq!(st.criteria_last_changed_at, changed_at);
    }

    #[test]
    fn immunization_without_codes_requires_vaccine_codes() {
        let mut st = base_type();
        st.is_immunization_based = true;
        assert!(st.requires_vaccine_codes());
        st.cvx_codes.push("88".into());
        assert!(!st.requires_vaccine_codes());
    }
}
