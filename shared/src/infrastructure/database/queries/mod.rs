pub mod users;
pub mod roles;
pub mod permissions;
pub mod refresh_tokens;
pub mod relationships;
pub mod encryption_keys;
pub mod common;
pub mod healthprep;

pub use users::*;
pub use roles::*;
pub use permissions::*;
pub use refresh_tokens::*;
pub use relationships::*;
pub use encryption_keys::*;
pub use common::*;

