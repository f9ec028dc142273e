//! Policy document parsing.
//!
//! A policy is a flat map of path patterns to the capabilities a token
//! holding it is granted on paths matching that pattern. Patterns ending in
//! `*` are prefix rules; anything else must match the request path exactly.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{VaultError, VaultResult};

/// Policy names no token can create, modify, or delete through the API.
pub const IMMUTABLE_POLICIES: &[&str] = &["root", "default"];

/// Granted on every token unless the realm overrides it: read-only access
/// to the token's own identity.
pub const DEFAULT_POLICY: &str = r#"{
    "name": "default",
    "path": {
        "auth/token/lookup-self": { "capabilities": ["read"] },
        "auth/token/renew-self": { "capabilities": ["update"] },
        "auth/token/revoke-self": { "capabilities": ["update"] }
    }
}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyType {
    #[default]
    Acl,
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyType::Acl => write!(f, "acl"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathCapabilities {
    pub capabilities: Vec<String>,
}

/// An in-memory, parsed policy. `raw` is the original JSON document as
/// received from the client -- kept verbatim so `read_policy` can echo it
/// back unchanged.
#[derive(Debug, Clone, Default)]
pub struct Policy {
    pub name: String,
    pub raw: String,
    pub policy_type: PolicyType,
    pub paths: HashMap<String, PathCapabilities>,
}

#[derive(Debug, Deserialize)]
struct PolicyDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    path: HashMap<String, PathCapabilities>,
}

impl Policy {
    pub fn from_json(raw: &str) -> VaultResult<Self> {
        let doc: PolicyDocument = serde_json::from_str(raw)
            .map_err(|e| VaultError::Vault(format!("invalid policy document: {e}")))?;

        Ok(Self {
            name: doc.name.unwrap_or_default(),
            raw: raw.to_string(),
            policy_type: PolicyType::Acl,
            paths: doc.path,
        })
    }
}

/// The subset of a `Policy` persisted in the `parsed_policy` JSONB column --
/// flattened to plain path -> capability-list pairs for fast querying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub name: String,
    pub paths: HashMap<String, Vec<String>>,
}

impl PolicyEntry {
    pub fn from_policy(policy: &Policy) -> Self {
        Self {
            name: policy.name.clone(),
            paths: policy
                .paths
                .iter()
                .map(|(path, rule)| (path.clone(), rule.capabilities.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_path_rules() {
        let policy = Policy::from_json(DEFAULT_POLICY).unwrap();
        assert_eq!(policy.name, "default");
        assert!(policy.paths.contains_key("auth/token/lookup-self"));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Policy::from_json("not json").is_err());
    }
}
