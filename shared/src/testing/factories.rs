/**
 * Test Data Factories
 *
 * Provides factory functions for creating test entities with realistic defaults.
 * Eliminates boilerplate in test setup.
 *
 * # Examples
 *
 * ```rust
 * use shared::testing::UserFactory;
 *
 * let user = UserFactory::build();
 * let admin = UserFactory::build_admin();
 * let custom_user = UserFactory::build_with(|u| {
 *     u.email = "custom@test.com".to_string();
 * });
 * ```
 */

use chrono::{NaiveDate, Utc};
use uuid::Uuid;
use crate::domain::entities::user::User;
use crate::domain::entities::healthprep::{
    AsyncJob, EligibleSexes, EpicEnvironment, Frequency, FrequencyUnit, JobPriority, JobType,
    Patient, ScreeningCategory, ScreeningType, Sex, Tenant,
};

/// User Factory
pub struct UserFactory;

impl UserFactory {
    /// Build a basic test user with defaults
    pub fn build() -> User {
        let timestamp = Utc::now().timestamp_millis();
        User {
            id: Uuid::new_v4(),
            email: format!("test-user-{}@example.com", timestamp),
            username: format!("testuser_{}", timestamp),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$testpassword123$J8K9L0M1N2O3P4Q5R6S7T8U9V0W1X2Y3".to_string(),
            is_active: true,
            is_verified: true,
            is_super_user: false,
            organization_id: None,
            tenant_id: None,
            last_login: None,
            request_id: Some(format!("test-req-{}", Uuid::new_v4())),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
            updated_by: None,
            system_id: Some("test-system".to_string()),
            version: 1,
        }
    }

    /// Build an admin user
    pub fn build_admin() -> User {
        let mut user = Self::build();
        user.is_super_user = true;
        user.email = format!("admin-{}@example.com", Utc::now().timestamp_millis());
        user.username = format!("admin_{}", Utc::now().timestamp_millis());
        user
    }

    /// Build with custom modifications
    pub fn build_with<F>(modifier: F) -> User
    where
        F: FnOnce(&mut User),
    {
        let mut user = Self::build();
        modifier(&mut user);
        user
    }

    /// Build with specific email
    pub fn build_with_email(email: &str) -> User {
        Self::build_with(|u| {
            u.email = email.to_string();
        })
    }

    /// Build with specific organization
    pub fn build_with_organization(org_id: Uuid) -> User {
        Self::build_with(|u| {
            u.organization_id = Some(org_id);
        })
    }

    /// Build a user scoped to a tenant
    pub fn build_with_tenant(tenant_id: Uuid) -> User {
        Self::build_with(|u| {
            u.tenant_id = Some(tenant_id);
        })
    }

    /// Build unverified user
    pub fn build_unverified() -> User {
        Self::build_with(|u| {
            u.is_verified = false;
        })
    }

    /// Build inactive user
    pub fn build_inactive() -> User {
        Self::build_with(|u| {
            u.is_active = false;
        })
    }

    /// Build multiple users at once
    pub fn build_many(count: usize) -> Vec<User> {
        (0..count).map(|i| {
            Self::build_with(|u| {
                u.email = format!("test-user-{}@example.com", i);
                u.username = format!("testuser_{}", i);
            })
        }).collect()
    }
}

/// Parse test organization ID
pub fn test_org_id() -> Uuid {
    use crate::testing::fixtures::TEST_ORG_ID;
    Uuid::parse_str(TEST_ORG_ID).expect("Invalid test org ID")
}

/// Generate a test UUID with prefix
pub fn test_uuid(prefix: &str) -> Uuid {
    let timestamp = Utc::now().timestamp_millis();
    // Create a deterministic but unique UUID for testing
    let uuid_str = format!("{:08x}-0000-4000-8000-{:012x}",
        prefix.bytes().fold(0u32, |acc, b| acc.wrapping_add(b as u32)),
        timestamp
    );
    Uuid::parse_str(&uuid_str).unwrap_or_else(|_| Uuid::new_v4())
}

/// Tenant Factory
pub struct TenantFactory;

impl TenantFactory {
    pub fn build() -> Tenant {
        let timestamp = Utc::now().timestamp_millis();
        let mut tenant = Tenant::new(
            format!("test-tenant-{}", timestamp),
            format!("Test Tenant {}", timestamp),
            EpicEnvironment::Sandbox,
        );
        tenant.approve(Uuid::new_v4());
        tenant
    }

    pub fn build_with<F>(modifier: F) -> Tenant
    where
        F: FnOnce(&mut Tenant),
    {
        let mut tenant = Self::build();
        modifier(&mut tenant);
        tenant
    }

    pub fn build_pending_approval() -> Tenant {
        let timestamp = Utc::now().timestamp_millis();
        Tenant::new(
            format!("pending-tenant-{}", timestamp),
            format!("Pending Tenant {}", timestamp),
            EpicEnvironment::Sandbox,
        )
    }
}

/// Patient Factory
pub struct PatientFactory;

impl PatientFactory {
    pub fn build(tenant_id: Uuid) -> Patient {
        let timestamp = Utc::now().timestamp_millis();
        Patient::new(
            tenant_id,
            format!("MRN-{}", timestamp),
            "Test Patient".to_string(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
            Sex::Female,
        )
    }

    pub fn build_with<F>(tenant_id: Uuid, modifier: F) -> Patient
    where
        F: FnOnce(&mut Patient),
    {
        let mut patient = Self::build(tenant_id);
        modifier(&mut patient);
        patient
    }
}

/// ScreeningType Factory
pub struct ScreeningTypeFactory;

impl ScreeningTypeFactory {
    pub fn build(tenant_id: Option<Uuid>) -> ScreeningType {
        ScreeningType::new(
            tenant_id,
            "Test Screening".to_string(),
            EligibleSexes::Both,
            Frequency { value: 1, unit: FrequencyUnit::Years },
            ScreeningCategory::General,
        )
    }

    pub fn build_with<F>(tenant_id: Option<Uuid>, modifier: F) -> ScreeningType
    where
        F: FnOnce(&mut ScreeningType),
    {
        let mut st = Self::build(tenant_id);
        modifier(&mut st);
        st.criteria_signature = st.compute_criteria_signature();
        st
    }
}

/// AsyncJob Factory
pub struct AsyncJobFactory;

impl AsyncJobFactory {
    pub fn build(tenant_id: Uuid, user_id: Uuid) -> AsyncJob {
        AsyncJob::new(
            tenant_id,
            user_id,
            JobType::BatchSync,
            JobPriority::Normal,
            1,
            serde_json::json!({}),
        )
    }

    pub fn build_with<F>(tenant_id: Uuid, user_id: Uuid, modifier: F) -> AsyncJob
    where
        F: FnOnce(&mut AsyncJob),
    {
        let mut job = Self::build(tenant_id, user_id);
        modifier(&mut job);
        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_factory_build() {
        let user = UserFactory::build();
        assert!(user.email.contains("@example.com"));
        assert!(user.is_active);
        assert!(user.is_verified);
        assert!(!user.is_super_user);
    }

    #[test]
    fn test_user_factory_build_admin() {
        let admin = UserFactory::build_admin();
        assert!(admin.is_super_user);
        assert!(admin.email.contains("admin"));
    }

    #[test]
    fn test_user_factory_build_with() {
        let user = UserFactory::build_with(|u| {
            u.email = "custom@test.com".to_string();
        });
        assert_eq!(user.email, "custom@test.com");
    }

    #[test]
    fn test_user_factory_build_many() {
        let users = UserFactory::build_many(5);
        assert_eq!(users.len(), 5);
        // Ensure emails are unique
        let emails: Vec<String> = users.iter().map(|u| u.email.clone()).collect();
        let unique_emails: std::collections::HashSet<String> = emails.into_iter().collect();
        assert_eq!(unique_emails.len(), 5);
    }

    #[test]
    fn test_tenant_factory_build_is_active() {
        let tenant = TenantFactory::build();
        assert!(tenant.is_active());
    }

    #[test]
    fn test_tenant_factory_pending_approval() {
        let tenant = TenantFactory::build_pending_approval();
        assert!(!tenant.is_active());
    }

    #[test]
    fn test_patient_factory_build() {
        let tenant_id = Uuid::new_v4();
        let patient = PatientFactory::build(tenant_id);
        assert_eq!(patient.tenant_id, tenant_id);
        assert!(patient.mrn.starts_with("MRN-"));
    }

    #[test]
    fn test_screening_type_factory_build() {
        let st = ScreeningTypeFactory::build(None);
        assert!(st.tenant_id.is_none());
        assert!(!st.criteria_signature.is_empty());
    }

    #[test]
    fn test_async_job_factory_build() {
        let job = AsyncJobFactory::build(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(job.status, crate::domain::entities::healthprep::JobStatus::Queued);
    }
}
