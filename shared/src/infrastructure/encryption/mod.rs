pub mod vault;
pub mod vault_impl;
pub mod dek_manager;
pub mod master_key;
pub mod field_encryption;

pub use vault::Vault;
pub use dek_manager::DekManager;
pub use master_key::MasterKey;
pub use field_encryption::FieldEncryption;

