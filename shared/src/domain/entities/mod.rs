pub mod user;
pub mod role;
pub mod permission;
pub mod relationship;
pub mod encryption_key;
pub mod healthprep;

pub use user::User;
pub use role::Role;
pub use permission::Permission;
pub use relationship::Relationship;
pub use encryption_key::EncryptionKey;
pub use healthprep::*;

