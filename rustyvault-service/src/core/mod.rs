pub mod vault_core;

pub use vault_core::{CoreState, InitResult, SealConfig, VaultCore};
