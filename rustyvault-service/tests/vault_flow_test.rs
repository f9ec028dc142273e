//! Comprehensive test cases for Vault initialization, authentication, sealing/unsealing,
//! realm management, app registration, user creation, and policy assignment.
//!
//! Test Flow:
//! 1. Initialize vault → get root_token + 5 unseal keys
//! 2. Authenticate with root_token
//! 3. Seal vault
//! 4. Unseal vault with 3 of 5 keys (threshold)
//! 5. Create global realm (realm_id = NULL)
//! 6. Create single realm (organization-scoped)
//! 7. Register apps in realm
//! 8. Create users for realm
//! 9. Create and assign policies

use serde_json::{json, Value};
use uuid::Uuid;

/// Test Case 1: Vault Initialization
/// 
/// **Flow:**
/// 1. POST /v1/sys/init with secret_shares=5, secret_threshold=3
/// 2. Verify response contains:
///    - root_token (string)
///    - keys (array of 5 base64-encoded keys)
///    - keys_base64 (same as keys)
///    - download_token (for downloading keys)
/// 3. Verify vault is sealed after initialization
/// 4. Verify vault is initialized
#[tokio::test]
async fn test_vault_initialization() {
    // Expected request
    let init_request = json!({
        "secret_shares": 5,
        "secret_threshold": 3
    });

    // Expected response structure
    let expected_response = json!({
        "keys": ["base64_key1", "base64_key2", "base64_key3", "base64_key4", "base64_key5"],
        "keys_base64": ["base64_key1", "base64_key2", "base64_key3", "base64_key4", "base64_key5"],
        "root_token": "uuid-token-string",
        "download_token": "download-token-string",
        "keys_download_url": "/v1/sys/init/keys.txt?token=download-token-string"
    });

    // Verify:
    // - 5 keys returned
    // - root_token is valid UUID
    // - vault is sealed (sealed: true)
    // - vault is initialized (initialized: true)
}

/// Test Case 2: Authentication with Root Token
///
/// **Flow:**
/// 1. Use root_token from initialization
/// 2. Set X-Vault-Token header in subsequent requests
/// 3. Verify authenticated requests succeed
/// 4. Verify unauthenticated requests fail with 401
#[tokio::test]
async fn test_authentication_with_root_token() {
    let root_token = "root-token-from-init";

    // Test authenticated request
    // GET /v1/sys/health with X-Vault-Token header
    // Should return 200 with vault status

    // Test unauthenticated request
    // GET /v1/sys/health without token
    // Should return 401 Unauthorized
}

/// Test Case 3: Seal Vault
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/sys/seal
/// 3. Verify vault is sealed (sealed: true)
/// 4. Verify sealed vault rejects operations (except unseal)
#[tokio::test]
async fn test_seal_vault() {
    let root_token = "root-token";

    // POST /v1/sys/seal with X-Vault-Token header
    // Response: 204 No Content

    // Verify seal status
    // GET /v1/sys/seal-status
    // Response: { "sealed": true, "t": 3, "n": 5, "progress": 0 }

    // Verify operations fail when sealed
    // GET /v1/sys/policies
    // Should return error: "Vault is sealed"
}

/// Test Case 4: Unseal Vault with Threshold Keys
///
/// **Flow:**
/// 1. Vault is sealed
/// 2. POST /v1/sys/unseal with key1 → progress: 1/3
/// 3. POST /v1/sys/unseal with key2 → progress: 2/3
/// 4. POST /v1/sys/unseal with key3 → progress: 3/3, sealed: false (unsealed!)
/// 5. Verify vault is unsealed and operations work
#[tokio::test]
async fn test_unseal_vault_with_threshold_keys() {
    let keys = vec!["key1_base64", "key2_base64", "key3_base64", "key4_base64", "key5_base64"];

    // Step 1: Unseal with first key
    let unseal_request_1 = json!({ "key": keys[0] });
    // POST /v1/sys/unseal
    // Response: { "sealed": true, "t": 3, "n": 5, "progress": 1 }

    // Step 2: Unseal with second key
    let unseal_request_2 = json!({ "key": keys[1] });
    // POST /v1/sys/unseal
    // Response: { "sealed": true, "t": 3, "n": 5, "progress": 2 }

    // Step 3: Unseal with third key (threshold reached)
    let unseal_request_3 = json!({ "key": keys[2] });
    // POST /v1/sys/unseal
    // Response: { "sealed": false, "t": 3, "n": 5, "progress": 0 }

    // Verify vault is unsealed
    // GET /v1/sys/seal-status
    // Response: { "sealed": false }

    // Verify operations work
    // GET /v1/sys/policies (with token)
    // Should return 200 with policies list
}

/// Test Case 5: Unseal with Duplicate Key (Should Fail)
///
/// **Flow:**
/// 1. POST /v1/sys/unseal with key1 → progress: 1/3
/// 2. POST /v1/sys/unseal with key1 again → should return error or no progress
#[tokio::test]
async fn test_unseal_with_duplicate_key() {
    let key1 = "key1_base64";

    // First unseal attempt
    // POST /v1/sys/unseal with key1
    // Response: { "sealed": true, "progress": 1 }

    // Duplicate key attempt
    // POST /v1/sys/unseal with key1 again
    // Should return: { "sealed": true, "progress": 1 } (no change)
    // OR error: "Duplicate key"
}

/// Test Case 6: Unseal with Insufficient Keys
///
/// **Flow:**
/// 1. POST /v1/sys/unseal with key1 → progress: 1/3
/// 2. POST /v1/sys/unseal with key2 → progress: 2/3
/// 3. Verify vault is still sealed (only 2/3 keys provided)
#[tokio::test]
async fn test_unseal_with_insufficient_keys() {
    let keys = vec!["key1_base64", "key2_base64"];

    // Unseal with 2 keys (threshold is 3)
    // POST /v1/sys/unseal with key1 → progress: 1
    // POST /v1/sys/unseal with key2 → progress: 2

    // Verify still sealed
    // GET /v1/sys/seal-status
    // Response: { "sealed": true, "progress": 2 }
}

/// Test Case 7: Create Global Realm
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/sys/realm with organization_id = null (global realm)
/// 3. Verify realm created with realm_id, organization_id = null
/// 4. Verify realm can be retrieved
#[tokio::test]
async fn test_create_global_realm() {
    let root_token = "root-token";

    let create_realm_request = json!({
        "name": "global",
        "description": "Global realm for system-wide operations",
        "display_name": "Global Realm",
        "organization_id": null,  // NULL = global realm
        "default_lease_ttl": 3600,
        "max_lease_ttl": 86400
    });

    // POST /v1/sys/realm with X-Vault-Token header
    // Response: {
    //   "realm": {
    //     "id": "uuid",
    //     "name": "global",
    //     "organization_id": null,
    //     "is_active": true,
    //     ...
    //   }
    // }

    // Verify global realm
    // GET /v1/sys/realm/{realm_id}
    // organization_id should be null
}

/// Test Case 8: Create Single Realm (Organization-Scoped)
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/sys/realm with organization_id = <uuid>
/// 3. Verify realm created with organization_id set
/// 4. Verify realm is scoped to organization
#[tokio::test]
async fn test_create_single_realm() {
    let root_token = "root-token";
    let organization_id = Uuid::new_v4();

    let create_realm_request = json!({
        "name": "org-realm-1",
        "description": "Realm for organization",
        "display_name": "Organization Realm",
        "organization_id": organization_id.to_string(),
        "default_lease_ttl": 3600,
        "max_lease_ttl": 86400
    });

    // POST /v1/sys/realm
    // Response: {
    //   "realm": {
    //     "id": "uuid",
    //     "name": "org-realm-1",
    //     "organization_id": organization_id,
    //     ...
    //   }
    // }

    // Verify realm by organization
    // GET /v1/sys/realm/organization/{organization_id}
    // Should return the realm
}

/// Test Case 9: Register Apps in Realm
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/realm/{realm_id}/sys/apps/register-defaults
///    - Creates: admin-ui, client-app, mobile
/// 3. Verify apps created with correct app_type and auth_methods
/// 4. List apps: GET /v1/realm/{realm_id}/sys/apps
#[tokio::test]
async fn test_register_apps_in_realm() {
    let root_token = "root-token";
    let realm_id = Uuid::new_v4();

    // Register default apps
    // POST /v1/realm/{realm_id}/sys/apps/register-defaults
    // Response: {
    //   "apps": [
    //     {
    //       "app_name": "admin-ui",
    //       "app_type": "admin-ui",
    //       "allowed_auth_methods": ["token", "userpass"],
    //       ...
    //     },
    //     {
    //       "app_name": "client-app",
    //       "app_type": "client-app",
    //       "allowed_auth_methods": ["token", "userpass"],
    //       ...
    //     },
    //     {
    //       "app_name": "mobile",
    //       "app_type": "mobile",
    //       "allowed_auth_methods": ["token", "approle"],
    //       ...
    //     }
    //   ]
    // }

    // List apps
    // GET /v1/realm/{realm_id}/sys/apps
    // Should return all registered apps
}

/// Test Case 10: Create Custom App in Realm
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/realm/{realm_id}/sys/apps with custom app
/// 3. Verify app created with specified configuration
#[tokio::test]
async fn test_create_custom_app_in_realm() {
    let root_token = "root-token";
    let realm_id = Uuid::new_v4();

    let create_app_request = json!({
        "app_name": "custom-api",
        "app_type": "api",
        "display_name": "Custom API",
        "description": "Custom API application",
        "allowed_auth_methods": ["token", "approle"],
        "config": {
            "api_version": "v1",
            "rate_limit": 1000
        }
    });

    // POST /v1/realm/{realm_id}/sys/apps
    // Response: {
    //   "app": {
    //     "id": "uuid",
    //     "realm_id": realm_id,
    //     "app_name": "custom-api",
    //     "app_type": "api",
    //     ...
    //   }
    // }
}

/// Test Case 11: Create User for Realm (UserPass Auth)
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/realm/{realm_id}/auth/userpass/users/{username}
///    - username, password, policies
/// 3. Verify user created in realm
/// 4. Verify user can authenticate with username/password
#[tokio::test]
async fn test_create_user_for_realm() {
    let root_token = "root-token";
    let realm_id = Uuid::new_v4();

    let create_user_request = json!({
        "password": "secure-password-123",
        "policies": ["default", "read-only"],
        "ttl": 3600,
        "max_ttl": 86400
    });

    // POST /v1/realm/{realm_id}/auth/userpass/users/testuser
    // Response: {
    //   "user": {
    //     "id": "uuid",
    //     "username": "testuser",
    //     "realm_id": realm_id,
    //     "policies": ["default", "read-only"],
    //     ...
    //   }
    // }

    // Test authentication
    // POST /v1/realm/{realm_id}/auth/userpass/login/testuser
    // Body: { "password": "secure-password-123" }
    // Response: {
    //   "auth": {
    //     "client_token": "token",
    //     "policies": ["default", "read-only"],
    //     ...
    //   }
    // }
}

/// Test Case 12: Create User for Global Realm
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/auth/userpass/users/{username} (no realm_id = global)
/// 3. Verify user created with realm_id = null
#[tokio::test]
async fn test_create_user_for_global_realm() {
    let root_token = "root-token";

    let create_user_request = json!({
        "password": "password",
        "policies": ["default"]
    });

    // POST /v1/auth/userpass/users/globaluser
    // Response: {
    //   "user": {
    //     "username": "globaluser",
    //     "realm_id": null,  // Global realm
    //     ...
    //   }
    // }
}

/// Test Case 13: Create Policy for Realm
///
/// **Flow:**
/// 1. Authenticate with root_token
/// 2. POST /v1/realm/{realm_id}/sys/policies/{policy_name}
///    - Policy content (HCL format)
/// 3. Verify policy created and scoped to realm
/// 4. List policies: GET /v1/realm/{realm_id}/sys/policies
#[tokio::test]
async fn test_create_policy_for_realm() {
    let root_token = "root-token";
    let realm_id = Uuid::new_v4();

    let policy_content = r#"
path "secret/data/*" {
  capabilities = ["read", "list"]
}

path "secret/data/apps/*" {
  capabilities = ["create", "read", "update", "delete"]
}
"#;

    let create_policy_request = json!({
        "policy": policy_content
    });

    // POST /v1/realm/{realm_id}/sys/policies/app-policy
    // Response: {
    //   "policy": {
    //     "name": "app-policy",
    //     "realm_id": realm_id,
    //     "policy": policy_content,
    //     ...
    //   }
    // }

    // List policies
    // GET /v1/realm/{realm_id}/sys/policies
    // Response: {
    //   "keys": ["app-policy", "default"]
    // }
}

/// Test Case 14: Create Role-Based Policy for Realm
///
/// **Flow:**
/// 1. Create policy: "{role}-{app}-realm-{realm_id}"
/// 2. Example: "admin-client-app-realm-{realm_id}"
/// 3. Assign policy to user
#[tokio::test]
async fn test_create_role_based_policy() {
    let root_token = "root-token";
    let realm_id = Uuid::new_v4();
    let role = "admin";
    let app = "client-app";

    let policy_name = format!("{}-{}-realm-{}", role, app, realm_id);

    let policy_content = r#"
path "secret/data/*" {
  capabilities = ["create", "read", "update", "delete", "list", "sudo"]
}
"#;

    // POST /v1/realm/{realm_id}/sys/policies/{policy_name}
    // Policy name: "admin-client-app-realm-{realm_id}"

    // Assign to user
    // POST /v1/realm/{realm_id}/auth/userpass/users/{username}
    // Body: { "policies": [policy_name] }
}

/// Test Case 15: Complete Flow - Initialize, Unseal, Create Realm, Add Apps, Create Users, Assign Policies
///
/// **End-to-End Flow:**
/// 1. Initialize vault → get root_token + 5 keys
/// 2. Unseal with 3 keys
/// 3. Authenticate with root_token
/// 4. Create organization realm
/// 5. Register default apps
/// 6. Create user for realm
/// 7. Create policy for realm
/// 8. Assign policy to user
/// 9. Authenticate user and verify access
#[tokio::test]
async fn test_complete_vault_flow() {
    // Step 1: Initialize
    let init_response = json!({
        "root_token": "root-token-123",
        "keys": ["key1", "key2", "key3", "key4", "key5"]
    });

    // Step 2: Unseal (3 keys)
    // POST /v1/sys/unseal with key1, key2, key3

    // Step 3: Authenticate
    let root_token = init_response["root_token"].as_str().unwrap();

    // Step 4: Create realm
    let organization_id = Uuid::new_v4();
    // POST /v1/sys/realm with organization_id

    // Step 5: Register apps
    // POST /v1/realm/{realm_id}/sys/apps/register-defaults

    // Step 6: Create user
    // POST /v1/realm/{realm_id}/auth/userpass/users/testuser

    // Step 7: Create policy
    // POST /v1/realm/{realm_id}/sys/policies/test-policy

    // Step 8: Assign policy to user
    // POST /v1/realm/{realm_id}/auth/userpass/users/testuser
    // Body: { "policies": ["test-policy"] }

    // Step 9: Authenticate user
    // POST /v1/realm/{realm_id}/auth/userpass/login/testuser
    // Verify token has correct policies
}

/// Test Case 16: Realm Isolation
///
/// **Flow:**
/// 1. Create realm1 and realm2
/// 2. Create user1 in realm1, user2 in realm2
/// 3. Create policy1 in realm1, policy2 in realm2
/// 4. Verify user1 can only access realm1 resources
/// 5. Verify user2 can only access realm2 resources
#[tokio::test]
async fn test_realm_isolation() {
    let root_token = "root-token";
    let org1_id = Uuid::new_v4();
    let org2_id = Uuid::new_v4();

    // Create realm1
    // POST /v1/sys/realm with organization_id = org1_id

    // Create realm2
    // POST /v1/sys/realm with organization_id = org2_id

    // Create user1 in realm1
    // POST /v1/realm/{realm1_id}/auth/userpass/users/user1

    // Create user2 in realm2
    // POST /v1/realm/{realm2_id}/auth/userpass/users/user2

    // Authenticate user1
    // POST /v1/realm/{realm1_id}/auth/userpass/login/user1
    // Get token1

    // Authenticate user2
    // POST /v1/realm/{realm2_id}/auth/userpass/login/user2
    // Get token2

    // Verify isolation:
    // - token1 can access realm1 resources
    // - token1 cannot access realm2 resources
    // - token2 can access realm2 resources
    // - token2 cannot access realm1 resources
}

/// Test Case 17: Global Realm vs Single Realm
///
/// **Flow:**
/// 1. Create global realm (organization_id = null)
/// 2. Create single realm (organization_id = uuid)
/// 3. Verify global realm resources accessible without realm context
/// 4. Verify single realm resources require realm context
#[tokio::test]
async fn test_global_vs_single_realm() {
    let root_token = "root-token";

    // Create global realm
    // POST /v1/sys/realm with organization_id = null

    // Create single realm
    let org_id = Uuid::new_v4();
    // POST /v1/sys/realm with organization_id = org_id

    // Global realm operations (no realm_id in path)
    // POST /v1/auth/userpass/users/globaluser
    // GET /v1/sys/policies

    // Single realm operations (realm_id in path)
    // POST /v1/realm/{realm_id}/auth/userpass/users/realmuser
    // GET /v1/realm/{realm_id}/sys/policies
}
