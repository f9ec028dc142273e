pub mod provider;
pub mod token;
pub mod jwks;

pub use self::provider::{FhirTokenSet, OidcProvider, SmartConfiguration};
pub use self::token::{Claims, TokenManager};
pub use self::jwks::Jwks;
