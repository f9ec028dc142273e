pub mod tenant_repository;
pub mod provider_repository;
pub mod patient_repository;
pub mod screening_type_repository;
pub mod screening_repository;
pub mod document_repository;
pub mod appointment_repository;
pub mod async_job_repository;
pub mod fhir_api_call_repository;
pub mod audit_repository;

pub use tenant_repository::TenantRepository;
pub use provider_repository::ProviderRepository;
pub use patient_repository::{PatientRepository, ProviderScope};
pub use screening_type_repository::ScreeningTypeRepository;
pub use screening_repository::ScreeningRepository;
pub use document_repository::DocumentRepository;
pub use appointment_repository::AppointmentRepository;
pub use async_job_repository::AsyncJobRepository;
pub use fhir_api_call_repository::FhirApiCallRepository;
pub use audit_repository::AuditRepository;
