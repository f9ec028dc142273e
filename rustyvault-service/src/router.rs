//! Dispatches a logical request to whichever backend owns its mount path.

use std::sync::Arc;
use dashmap::DashMap;

use crate::errors::VaultResult;
use crate::logical::{Backend, Request, Response};

/// Mount table mapping a leading path segment (e.g. `"secret"`) to the
/// backend that serves it.
pub struct Router {
    mounts: DashMap<String, Arc<dyn Backend>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            mounts: DashMap::new(),
        }
    }

    pub fn add_backend(&self, mount: String, backend: Arc<dyn Backend>) {
        let mount = mount.trim_matches('/').to_string();
        self.mounts.insert(mount, backend);
    }

    pub fn remove_backend(&self, mount: &str) {
        self.mounts.remove(mount.trim_matches('/'));
    }

    /// Route `req` to the backend mounted at its path's first segment.
    /// `Ok(None)` means no backend claims the path.
    pub async fn route(&self, req: &mut Request) -> VaultResult<Option<Response>> {
        let path = req.path.trim_start_matches('/');
        let mount = path.split('/').next().unwrap_or("");

        match self.mounts.get(mount) {
            Some(backend) => backend.handle_request(req).await,
            None => Ok(None),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Map;

    struct EchoBackend;

    #[async_trait]
    impl Backend for EchoBackend {
        async fn handle_request(&self, _req: &mut Request) -> VaultResult<Option<Response>> {
            Ok(Some(Response::new().data(Map::new())))
        }
    }

    #[tokio::test]
    async fn routes_to_mounted_backend() {
        let router = Router::new();
        router.add_backend("secret".to_string(), Arc::new(EchoBackend));

        let mut req = Request::new_read_request("secret/foo");
        let resp = router.route(&mut req).await.unwrap();
        assert!(resp.is_some());
    }

    #[tokio::test]
    async fn unmounted_path_returns_none() {
        let router = Router::new();
        let mut req = Request::new_read_request("nope/foo");
        let resp = router.route(&mut req).await.unwrap();
        assert!(resp.is_none());
    }
}
