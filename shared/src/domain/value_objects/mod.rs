pub mod email;
pub mod encrypted_value;

pub use email::Email;
pub use encrypted_value::EncryptedValue;

