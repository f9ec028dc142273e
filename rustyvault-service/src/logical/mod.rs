//! Logical request/response types shared by every mounted backend.

pub mod request;
pub mod response;

pub use request::{Operation, RealmContext, Request};
pub use response::{Response, ResponseAuth};

use async_trait::async_trait;

use crate::errors::VaultResult;

/// A mounted secrets or auth engine. The router dispatches a `Request` to
/// whichever backend owns its mount path; `Ok(None)` means the backend
/// understood the path but has nothing to return (e.g. a delete).
#[async_trait]
pub trait Backend: Send + Sync {
    async fn handle_request(&self, req: &mut Request) -> VaultResult<Option<Response>>;
}
