pub mod hashicorp;
pub mod aws_kms;
pub mod gcp_kms;
pub mod azure_keyvault;
pub mod rustyvault;

pub use hashicorp::HashiCorpVault;
pub use aws_kms::AwsKmsVault;
pub use gcp_kms::GcpKmsVault;
pub use azure_keyvault::AzureKeyVault;
pub use rustyvault::RustyVaultClient;

