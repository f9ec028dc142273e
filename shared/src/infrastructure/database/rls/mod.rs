pub mod policies;
pub mod zanzibar_rls;
pub mod context;

pub use policies::RlsPolicy;
pub use zanzibar_rls::ZanzibarRlsBridge;
pub use context::SecurityContext;

