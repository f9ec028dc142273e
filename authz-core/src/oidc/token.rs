// Session JWT issuance is shared across services; reuse the `shared` crate's
// implementation rather than duplicating the signing/validation logic here.
pub use shared::infrastructure::oidc::token::{Claims, TokenManager};
