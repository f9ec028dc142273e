pub mod vault_config;

pub use vault_config::{
    BarrierConfig, DatabaseConfig, MountsConfig, SealConfig, ServerConfig, StorageConfig,
    VaultSettings,
};
