//! Access-control list assembled from a token's policies.
//!
//! Exact-path rules are matched verbatim; `*`-suffixed rules are prefix
//! rules resolved by longest-prefix match via a radix trie, the same way
//! HashiCorp Vault's ACL does it.

use std::collections::HashSet;

use radix_trie::{Trie, TrieCommon};

use crate::errors::VaultResult;
use crate::logical::{Operation, Request};
use crate::modules::policy::Policy;

const ROOT_CAPABILITY: &str = "root";

/// Outcome of checking a request's operation against an ACL.
#[derive(Debug, Clone, Default)]
pub struct AllowResult {
    pub allowed: bool,
    pub capabilities: Vec<String>,
}

pub struct ACL {
    exact: std::collections::HashMap<String, HashSet<String>>,
    prefixes: Trie<String, HashSet<String>>,
    is_root: bool,
}

impl ACL {
    pub fn new(policies: &[std::sync::Arc<Policy>]) -> VaultResult<Self> {
        let is_root = policies.iter().any(|p| p.name == "root");

        let mut exact: std::collections::HashMap<String, HashSet<String>> = Default::default();
        let mut prefix_caps: std::collections::HashMap<String, HashSet<String>> = Default::default();

        for policy in policies {
            for (pattern, rule) in &policy.paths {
                if let Some(prefix) = pattern.strip_suffix('*') {
                    prefix_caps
                        .entry(prefix.to_string())
                        .or_default()
                        .extend(rule.capabilities.iter().cloned());
                } else {
                    exact
                        .entry(pattern.clone())
                        .or_default()
                        .extend(rule.capabilities.iter().cloned());
                }
            }
        }

        let mut prefixes: Trie<String, HashSet<String>> = Trie::new();
        for (prefix, caps) in prefix_caps {
            prefixes.insert(prefix, caps);
        }

        Ok(Self { exact, prefixes, is_root })
    }

    /// Capabilities granted on `path` by the union of every policy in this ACL.
    /// An exact match always wins over a prefix match.
    pub fn capabilities(&self, path: &str) -> Vec<String> {
        if self.is_root {
            return vec![ROOT_CAPABILITY.to_string()];
        }

        if let Some(caps) = self.exact.get(path) {
            return caps.iter().cloned().collect();
        }

        match self.prefixes.get_ancestor_value(&path.to_string()) {
            Some(caps) => caps.iter().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Whether this ACL grants `capability` (or root) on `path`.
    pub fn allows(&self, path: &str, capability: &str) -> bool {
        if self.is_root {
            return true;
        }
        let caps = self.capabilities(path);
        caps.iter().any(|c| c == capability || c == "sudo")
    }

    /// Check whether `req`'s operation is permitted by this ACL.
    ///
    /// `cap_check_only` mirrors Vault's `AllowOperation`: when set, the
    /// caller only wants the resolved capability set back and does not
    /// intend to execute the request, so no audit-relevant side effects
    /// should be triggered on the strength of this check alone.
    pub fn allow_operation(&self, req: &Request, cap_check_only: bool) -> VaultResult<AllowResult> {
        let _ = cap_check_only;

        if self.is_root {
            return Ok(AllowResult {
                allowed: true,
                capabilities: vec![ROOT_CAPABILITY.to_string()],
            });
        }

        let capabilities = self.capabilities(&req.path);
        let required = match req.operation {
            Operation::Read => "read",
            Operation::Write => "update",
            Operation::Delete => "delete",
            Operation::List => "list",
        };
        let allowed = capabilities.iter().any(|c| {
            c == required || c == "sudo" || (req.operation == Operation::Write && c == "create")
        });

        Ok(AllowResult {
            allowed,
            capabilities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::policy::{PathCapabilities, PolicyType};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn policy_with(name: &str, path: &str, caps: &[&str]) -> Arc<Policy> {
        let mut paths = HashMap::new();
        paths.insert(
            path.to_string(),
            PathCapabilities {
                capabilities: caps.iter().map(|s| s.to_string()).collect(),
            },
        );
        Arc::new(Policy {
            name: name.to_string(),
            raw: String::new(),
            policy_type: PolicyType::Acl,
            paths,
        })
    }

    #[test]
    fn exact_match_grants_listed_capability() {
        let policy = policy_with("p1", "secret/foo", &["read"]);
        let acl = ACL::new(&[policy]).unwrap();
        assert!(acl.allows("secret/foo", "read"));
        assert!(!acl.allows("secret/foo", "update"));
    }

    #[test]
    fn prefix_match_covers_descendants() {
        let policy = policy_with("p1", "secret/data/*", &["read", "list"]);
        let acl = ACL::new(&[policy]).unwrap();
        assert!(acl.allows("secret/data/patients/123", "read"));
        assert!(!acl.allows("secret/other/123", "read"));
    }

    #[test]
    fn root_policy_allows_everything() {
        let root = policy_with("root", "irrelevant", &[]);
        let acl = ACL::new(&[root]).unwrap();
        assert!(acl.allows("anything/at/all", "delete"));
    }

    #[test]
    fn allow_operation_matches_write_to_update_capability() {
        let policy = policy_with("p1", "secret/data/*", &["update"]);
        let acl = ACL::new(&[policy]).unwrap();
        let req = Request {
            path: "secret/data/patients/123".to_string(),
            operation: Operation::Write,
            ..Default::default()
        };
        let result = acl.allow_operation(&req, false).unwrap();
        assert!(result.allowed);
    }

    #[test]
    fn allow_operation_denies_missing_capability() {
        let policy = policy_with("p1", "secret/data/*", &["read"]);
        let acl = ACL::new(&[policy]).unwrap();
        let req = Request {
            path: "secret/data/patients/123".to_string(),
            operation: Operation::Delete,
            ..Default::default()
        };
        let result = acl.allow_operation(&req, false).unwrap();
        assert!(!result.allowed);
    }
}
