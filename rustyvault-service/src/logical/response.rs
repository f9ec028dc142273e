//! Response structure for vault operations

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Auth data attached to a response from an auth backend's login path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseAuth {
    pub client_token: String,
    pub accessor: String,
    pub policies: Vec<String>,
    pub token_ttl: i64,
    pub renewable: bool,
}

/// Logical response returned by a backend's `handle_request`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    pub data: Option<Map<String, Value>>,
    pub auth: Option<ResponseAuth>,
    pub warnings: Vec<String>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}
