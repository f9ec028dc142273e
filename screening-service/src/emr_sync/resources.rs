//! §4.2 fetch sequence: narrow parsing of the FHIR R4 JSON shapes the pipeline needs,
//! deliberately not a general-purpose FHIR model. Each function reads a `Bundle` or a
//! single resource `Value` and extracts only the fields a later step consumes.

use chrono::{NaiveDate, Utc};
use serde_json::Value;

/// `Bundle.entry[].resource`, or a single resource read directly (some EMR sandboxes
/// return a bare resource instead of a search-set bundle for a single-id GET).
pub fn bundle_resources(bundle: &Value) -> Vec<&Value> {
    if let Some(entries) = bundle.get("entry").and_then(Value::as_array) {
        entries.iter().filter_map(|e| e.get("resource")).collect()
    } else if bundle.get("resourceType").is_some() {
        vec![bundle]
    } else {
        Vec::new()
    }
}

fn as_str<'a>(v: &'a Value, field: &str) -> Option<&'a str> {
    v.get(field).and_then(Value::as_str)
}

/// First `Coding` of a `CodeableConcept`-shaped value.
fn first_coding_of(concept: &Value) -> Option<&Value> {
    concept.get("coding")?.as_array()?.first()
}

/// First `Coding` of the `CodeableConcept` at `resource[field]`.
fn first_coding<'a>(resource: &'a Value, field: &str) -> Option<&'a Value> {
    resource.get(field).and_then(first_coding_of)
}

/// Parsed `Patient` demographics (§4.2 step 1). `name`/`gender`/`birthDate` are read
/// here — unlike the sanitiser, the sync pipeline IS allowed to read these fields,
/// since they populate the local `Patient` row rather than an audit/log surface.
pub struct PatientDemographics {
    pub epic_patient_id: String,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub sex: shared::domain::entities::healthprep::Sex,
    pub mrn: Option<String>,
}

pub fn parse_patient(resource: &Value) -> Option<PatientDemographics> {
    use shared::domain::entities::healthprep::Sex;

    let epic_patient_id = as_str(resource, "id")?.to_string();
    let name = resource
        .get("name")
        .and_then(Value::as_array)
        .and_then(|names| names.first())
        .map(render_human_name)
        .unwrap_or_else(|| "Unknown".to_string());
    let date_of_birth = as_str(resource, "birthDate")
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive());
    let sex = match as_str(resource, "gender") {
        Some("male") => Sex::Male,
        Some("female") => Sex::Female,
        Some(_) => Sex::Other,
        None => Sex::Unknown,
    };
    let mrn = resource
        .get("identifier")
        .and_then(Value::as_array)
        .and_then(|ids| {
            ids.iter().find(|id| {
                id.get("type")
                    .and_then(|t| t.get("text"))
                    .and_then(Value::as_str)
                    .map(|t| t.eq_ignore_ascii_case("MRN"))
                    .unwrap_or(false)
            })
        })
        .and_then(|id| as_str(id, "value"))
        .map(str::to_string);

    Some(PatientDemographics { epic_patient_id, name, date_of_birth, sex, mrn })
}

fn render_human_name(name: &Value) -> String {
    let given = name
        .get("given")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    let family = as_str(name, "family").unwrap_or_default();
    format!("{given} {family}").trim().to_string()
}

/// §4.2 step 2: a parsed `Condition`.
pub struct ConditionFact {
    pub source_id: String,
    pub condition_name: String,
    pub icd10_code: Option<String>,
    pub active: bool,
    pub onset_date: Option<NaiveDate>,
}

pub fn parse_condition(resource: &Value) -> Option<ConditionFact> {
    let source_id = as_str(resource, "id")?.to_string();
    let coding = first_coding(resource, "code");
    let condition_name = coding
        .and_then(|c| as_str(c, "display"))
        .or_else(|| resource.get("code").and_then(|c| as_str(c, "text")))
        .unwrap_or("Unspecified condition")
        .to_string();
    let icd10_code = coding
        .filter(|c| as_str(c, "system").map(|s| s.contains("icd-10")).unwrap_or(false))
        .and_then(|c| as_str(c, "code"))
        .map(str::to_string);
    let clinical_status = resource
        .get("clinicalStatus")
        .and_then(first_coding_of)
        .and_then(|c| as_str(c, "code"))
        .map(str::to_string);
    let active = clinical_status.as_deref() != Some("resolved") && clinical_status.as_deref() != Some("inactive");
    let onset_date = as_str(resource, "onsetDateTime")
        .and_then(|s| NaiveDate::parse_from_str(&s[..10.min(s.len())], "%Y-%m-%d").ok());

    Some(ConditionFact { source_id, condition_name, icd10_code, active, onset_date })
}

/// §4.2 step 4: a parsed `DiagnosticReport` with `category = imaging`.
pub struct ImagingReport {
    pub source_id: String,
    pub loinc_code: Option<String>,
    pub category_code: Option<String>,
    pub document_date: NaiveDate,
}

pub fn is_imaging_category(resource: &Value) -> bool {
    resource
        .get("category")
        .and_then(Value::as_array)
        .map(|cats| {
            cats.iter().any(|c| {
                c.get("coding")
                    .and_then(Value::as_array)
                    .map(|codings| {
                        codings.iter().any(|coding| {
                            as_str(coding, "code").map(|code| code.eq_ignore_ascii_case("IMG")).unwrap_or(false)
                        })
                    })
                    .unwrap_or(false)
            })
        })
        .unwrap_or(false)
}

pub fn parse_imaging_report(resource: &Value) -> Option<ImagingReport> {
    let source_id = as_str(resource, "id")?.to_string();
    let loinc_code = first_coding(resource, "code")
        .filter(|c| as_str(c, "system").map(|s| s.contains("loinc.org")).unwrap_or(false))
        .and_then(|c| as_str(c, "code"))
        .map(str::to_string);
    let category_code = resource
        .get("category")
        .and_then(Value::as_array)
        .and_then(|cats| cats.first())
        .and_then(first_coding_of)
        .and_then(|c| as_str(c, "code"))
        .map(str::to_string);
    let document_date = as_str(resource, "effectiveDateTime")
        .or_else(|| as_str(resource, "issued"))
        .and_then(|s| NaiveDate::parse_from_str(&s[..10.min(s.len())], "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive());

    Some(ImagingReport { source_id, loinc_code, category_code, document_date })
}

/// §4.2 step 5: a `DocumentReference`'s addressable content, before OCR has run.
pub struct DocumentReferenceRef {
    pub source_id: String,
    pub content_type: String,
    pub loinc_code: Option<String>,
    pub category_codes: Vec<String>,
    pub document_date: NaiveDate,
    /// Either the inline base64 payload or a `Binary/{id}` reference to resolve.
    pub attachment: AttachmentSource,
}

pub enum AttachmentSource {
    Inline(String),
    BinaryUrl(String),
    None,
}

pub fn parse_document_reference(resource: &Value) -> Option<DocumentReferenceRef> {
    let source_id = as_str(resource, "id")?.to_string();
    let first_content = resource.get("content").and_then(Value::as_array).and_then(|c| c.first());
    let attachment_obj = first_content.and_then(|c| c.get("attachment"));
    let content_type = attachment_obj
        .and_then(|a| as_str(a, "contentType"))
        .unwrap_or("application/octet-stream")
        .to_string();
    let attachment = match attachment_obj {
        Some(a) => match a.get("data").and_then(Value::as_str) {
            Some(data) => AttachmentSource::Inline(data.to_string()),
            None => match a.get("url").and_then(Value::as_str) {
                Some(url) => AttachmentSource::BinaryUrl(url.to_string()),
                None => AttachmentSource::None,
            },
        },
        None => AttachmentSource::None,
    };
    let loinc_code = first_coding(resource, "type")
        .filter(|c| as_str(c, "system").map(|s| s.contains("loinc.org")).unwrap_or(false))
        .and_then(|c| as_str(c, "code"))
        .map(str::to_string);
    let category_codes = resource
        .get("category")
        .and_then(Value::as_array)
        .map(|cats| {
            cats.iter()
                .filter_map(first_coding_of)
                .filter_map(|c| as_str(c, "code").map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let document_date = as_str(resource, "date")
        .and_then(|s| NaiveDate::parse_from_str(&s[..10.min(s.len())], "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive());

    Some(DocumentReferenceRef {
        source_id,
        content_type,
        loinc_code,
        category_codes,
        document_date,
        attachment,
    })
}

/// §4.2 step 7: a parsed `Appointment`, already filtered to actionable statuses by
/// the caller (see `parse_appointment_status`).
pub struct AppointmentFact {
    pub source_id: String,
    pub scheduled_at: chrono::DateTime<Utc>,
    pub appointment_type: String,
    pub status: shared::domain::entities::healthprep::AppointmentStatus,
}

pub fn parse_appointment(resource: &Value) -> Option<AppointmentFact> {
    use shared::domain::entities::healthprep::AppointmentStatus;

    let source_id = as_str(resource, "id")?.to_string();
    let status = match as_str(resource, "status")? {
        "booked" => AppointmentStatus::Booked,
        "proposed" | "pending" => AppointmentStatus::Pending,
        "arrived" => AppointmentStatus::Arrived,
        "fulfilled" => AppointmentStatus::Completed,
        "cancelled" | "noshow" => AppointmentStatus::Cancelled,
        _ => AppointmentStatus::Scheduled,
    };
    let scheduled_at = as_str(resource, "start")
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);
    let appointment_type = resource
        .get("appointmentType")
        .and_then(first_coding_of)
        .and_then(|c| as_str(c, "display"))
        .unwrap_or("Appointment")
        .to_string();

    Some(AppointmentFact { source_id, scheduled_at, appointment_type, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_patient_demographics_from_bundle_entry() {
        let bundle = json!({
            "entry": [{
                "resource": {
                    "resourceType": "Patient",
                    "id": "epic-1",
                    "name": [{"given": ["Jane"], "family": "Doe"}],
                    "birthDate": "1970-06-15",
                    "gender": "female",
                    "identifier": [{"type": {"text": "MRN"}, "value": "MRN-42"}]
                }
            }]
        });
        let resources = bundle_resources(&bundle);
        let patient = parse_patient(resources[0]).unwrap();
        assert_eq!(patient.epic_patient_id, "epic-1");
        assert_eq!(patient.name, "Jane Doe");
        assert_eq!(patient.mrn.as_deref(), Some("MRN-42"));
    }

    #[test]
    fn resolved_condition_is_not_active() {
        let resource = json!({
            "id": "cond-1",
            "code": {"coding": [{"system": "http://hl7.org/fhir/sid/icd-10", "code": "E11.9", "display": "Type 2 diabetes"}]},
            "clinicalStatus": {"coding": [{"code": "resolved"}]}
        });
        let fact = parse_condition(&resource).unwrap();
        assert!(!fact.active);
        assert_eq!(fact.icd10_code.as_deref(), Some("E11.9"));
    }

    #[test]
    fn imaging_category_detection() {
        let resource = json!({"category": [{"coding": [{"code": "IMG"}]}]});
        assert!(is_imaging_category(&resource));
        let other = json!({"category": [{"coding": [{"code": "LAB"}]}]});
        assert!(!is_imaging_category(&other));
    }

    #[test]
    fn document_reference_prefers_inline_data_over_binary_url() {
        let resource = json!({
            "id": "doc-1",
            "content": [{"attachment": {"contentType": "text/plain", "data": "aGVsbG8=", "url": "Binary/1"}}],
            "type": {"coding": [{"system": "http://loinc.org", "code": "11506-3"}]}
        });
        let parsed = parse_document_reference(&resource).unwrap();
        assert!(matches!(parsed.attachment, AttachmentSource::Inline(ref s) if s == "aGVsbG8="));
        assert_eq!(parsed.loinc_code.as_deref(), Some("11506-3"));
    }

    #[test]
    fn appointment_status_mapping() {
        let resource = json!({"id": "appt-1", "status": "booked", "start": "2026-08-01T09:00:00Z"});
        let fact = parse_appointment(&resource).unwrap();
        assert_eq!(fact.source_id, "appt-1");
        assert!(matches!(
            fact.status,
            shared::domain::entities::healthprep::AppointmentStatus::Booked
        ));
    }
}
