//! §4.4 "FHIR resource sanitisation": strip PHI-bearing fields from a raw FHIR
//! resource before it is ever persisted, and replace subject/author references with
//! salted hashes rather than dropping them (the system still needs to join on them).

use rand::RngCore;
use serde_json::{Map, Value};
use shared::domain::entities::healthprep::hash_identifier;

use super::redact::redact;
use shared::domain::entities::healthprep::PhiFilterSettings;

/// Top-level fields removed outright: names, addresses, contact details, binary
/// payloads. Matches the source's `PHI_FIELDS_TO_REMOVE` plus `content[].attachment.data`,
/// which is handled separately since it's nested.
const PHI_FIELDS_TO_REMOVE: &[&str] = &[
    "name",
    "address",
    "telecom",
    "birthDate",
    "deceasedDateTime",
    "deceasedBoolean",
    "maritalStatus",
    "photo",
    "contact",
    "communication",
    "generalPractitioner",
    "managingOrganization",
    "link",
    "multipleBirthBoolean",
    "multipleBirthInteger",
    "description",
];

/// The sanitiser's reference-hash salt (§4.4). Derived from the process's session
/// secret when configured; otherwise a random per-process value — never a predictable
/// constant, so two deployments without a configured secret don't collide.
#[derive(Clone)]
pub struct SanitizerSalt(String);

impl SanitizerSalt {
    pub fn from_session_secret(secret: Option<&str>) -> Self {
        match secret {
            Some(s) if !s.is_empty() => Self(s.to_string()),
            _ => {
                tracing::warn!("no session secret configured; using a random per-process FHIR sanitiser salt");
                let mut bytes = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut bytes);
                Self(hex::encode(bytes))
            }
        }
    }

    fn hash(&self, identifier: &str) -> String {
        hash_identifier(&self.0, identifier)
    }
}

/// Sanitize a raw FHIR resource (as parsed JSON) for storage: remove PHI-bearing
/// fields, salted-hash reference identifiers, strip inline binary data, and run the
/// PHI regex pass over any remaining free text.
pub fn sanitize_resource(resource: &Value, salt: &SanitizerSalt, phi: &PhiFilterSettings) -> Value {
    let Value::Object(obj) = resource else {
        return resource.clone();
    };

    let mut sanitized = Map::new();
    for (key, value) in obj {
        if PHI_FIELDS_TO_REMOVE.contains(&key.as_str()) {
            continue;
        }
        match key.as_str() {
            "subject" | "author" | "performer" | "recorder" | "requester" => {
                sanitized.insert(key.clone(), sanitize_reference_field(value, salt));
            }
            "content" => {
                sanitized.insert(key.clone(), sanitize_content(value, phi));
            }
            _ => {
                sanitized.insert(key.clone(), sanitize_free_text(value, phi));
            }
        }
    }
    sanitized.insert("_sanitized".to_string(), Value::Bool(true));
    Value::Object(sanitized)
}

fn sanitize_reference_field(value: &Value, salt: &SanitizerSalt) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| sanitize_reference(v, salt)).collect()),
        other => sanitize_reference(other, salt),
    }
}

fn sanitize_reference(value: &Value, salt: &SanitizerSalt) -> Value {
    let Value::Object(obj) = value else {
        return Value::Null;
    };
    let mut out = Map::new();
    if let Some(Value::String(reference)) = obj.get("reference") {
        out.insert("reference".to_string(), Value::String(salt.hash(reference)));
    }
    Value::Object(out)
}

/// `content[].attachment` keeps only structural metadata; `data` (inline base64) is
/// dropped entirely and `title` runs through the PHI regex pass rather than being
/// trusted as-is.
fn sanitize_content(value: &Value, phi: &PhiFilterSettings) -> Value {
    let Value::Array(items) = value else {
        return Value::Array(Vec::new());
    };
    let sanitized_items = items
        .iter()
        .map(|item| {
            let Value::Object(item_obj) = item else {
                return Value::Null;
            };
            let mut out = Map::new();
            if let Some(Value::Object(attachment)) = item_obj.get("attachment") {
                let mut safe_attachment = Map::new();
                for field in ["url", "contentType", "size", "hash", "creation"] {
                    if let Some(v) = attachment.get(field) {
                        safe_attachment.insert(field.to_string(), v.clone());
                    }
                }
                if let Some(Value::String(title)) = attachment.get("title") {
                    safe_attachment
                        .insert("title".to_string(), Value::String(redact(title, phi).text));
                }
                out.insert("attachment".to_string(), Value::Object(safe_attachment));
            }
            if let Some(format) = item_obj.get("format") {
                out.insert("format".to_string(), format.clone());
            }
            Value::Object(out)
        })
        .collect();
    Value::Array(sanitized_items)
}

fn sanitize_free_text(value: &Value, phi: &PhiFilterSettings) -> Value {
    match value {
        Value::String(s) => Value::String(redact(s, phi).text),
        Value::Array(items) => Value::Array(items.iter().map(|v| sanitize_free_text(v, phi)).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), sanitize_free_text(v, phi)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn removes_phi_fields_and_hashes_subject_reference() {
        let salt = SanitizerSalt::from_session_secret(Some("test-secret"));
        let phi = PhiFilterSettings::default();
        let resource = json!({
            "resourceType": "DocumentReference",
            "id": "doc-1",
            "name": [{"family": "Doe"}],
            "subject": {"reference": "Patient/123"},
            "description": "Jane Doe's chart note, SSN 123-45-6789",
        });
        let sanitized = sanitize_resource(&resource, &salt, &phi);
        assert!(sanitized.get("name").is_none());
        assert!(sanitized.get("description").is_none());
        let subject_ref = sanitized["subject"]["reference"].as_str().unwrap();
        assert_ne!(subject_ref, "Patient/123");
        assert_eq!(subject_ref.len(), 64);
    }

    #[test]
    fn same_salt_hashes_the_same_reference_identically() {
        let salt = SanitizerSalt::from_session_secret(Some("test-secret"));
        let phi = PhiFilterSettings::default();
        let a = sanitize_resource(&json!({"subject": {"reference": "Patient/1"}}), &salt, &phi);
        let b = sanitize_resource(&json!({"subject": {"reference": "Patient/1"}}), &salt, &phi);
        assert_eq!(a["subject"]["reference"], b["subject"]["reference"]);
    }

    #[test]
    fn binary_attachment_data_is_dropped() {
        let salt = SanitizerSalt::from_session_secret(Some("test-secret"));
        let phi = PhiFilterSettings::default();
        let resource = json!({
            "content": [{"attachment": {"contentType": "application/pdf", "data": "base64stuff", "url": "Binary/1"}}]
        });
        let sanitized = sanitize_resource(&resource, &salt, &phi);
        assert!(sanitized["content"][0]["attachment"].get("data").is_none());
        assert_eq!(sanitized["content"][0]["attachment"]["url"], "Binary/1");
    }
}
