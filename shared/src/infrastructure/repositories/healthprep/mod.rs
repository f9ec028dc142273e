pub mod appointment_repository_impl;
pub mod async_job_repository_impl;
pub mod audit_repository_impl;
pub mod document_repository_impl;
pub mod fhir_api_call_repository_impl;
pub mod patient_repository_impl;
pub mod provider_repository_impl;
pub mod screening_repository_impl;
pub mod screening_type_repository_impl;
pub mod tenant_repository_impl;

pub use appointment_repository_impl::AppointmentRepositoryImpl;
pub use async_job_repository_impl::AsyncJobRepositoryImpl;
pub use audit_repository_impl::AuditRepositoryImpl;
pub use document_repository_impl::DocumentRepositoryImpl;
pub use fhir_api_call_repository_impl::FhirApiCallRepositoryImpl;
pub use patient_repository_impl::PatientRepositoryImpl;
pub use provider_repository_impl::ProviderRepositoryImpl;
pub use screening_repository_impl::ScreeningRepositoryImpl;
pub use screening_type_repository_impl::ScreeningTypeRepositoryImpl;
pub use tenant_repository_impl::TenantRepositoryImpl;
