//! §4.6 "Render to HTML". No templating crate exists anywhere in this stack's
//! dependency tree, so the document is built as a plain string — the same way the
//! source's audit-log file sink and this crate's other text outputs are assembled.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;

use super::compile::PrepSheetData;

/// §4.6 "convert to PDF using the tenant's static theme" — the theme is the fixed
/// CSS block below plus the tenant's display name in the header; there is no
/// per-tenant stylesheet storage, so "static" is taken literally.
fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_html(data: &PrepSheetData, tenant_display_name: &str, generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<style>");
    html.push_str(
        "body{font-family:Helvetica,Arial,sans-serif;color:#1a1a1a;margin:2em}\
         h1{font-size:1.4em;border-bottom:2px solid #2c5f8a;padding-bottom:0.3em}\
         h2{font-size:1.1em;color:#2c5f8a;margin-top:1.5em}\
         table{border-collapse:collapse;width:100%;margin-top:0.5em}\
         td,th{padding:0.3em 0.6em;border-bottom:1px solid #ddd;text-align:left;font-size:0.9em}\
         .muted{color:#666;font-size:0.85em}",
    );
    html.push_str("</style></head><body>");

    let _ = write!(html, "<h1>{} &mdash; Screening Prep Sheet</h1>", escape(tenant_display_name));
    let _ = write!(
        html,
        "<p class=\"muted\">Generated {}</p>",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );

    let demo = &data.demographics;
    html.push_str("<h2>Patient</h2><table>");
    let _ = write!(html, "<tr><th>Name</th><td>{}</td></tr>", escape(&demo.name));
    let _ = write!(html, "<tr><th>MRN</th><td>{}</td></tr>", escape(&demo.mrn));
    let _ = write!(
        html,
        "<tr><th>Date of Birth</th><td>{} (age {})</td></tr>",
        demo.date_of_birth, demo.age_years
    );
    let _ = write!(html, "<tr><th>Sex</th><td>{:?}</td></tr>", demo.sex);
    html.push_str("</table>");

    html.push_str("<h2>Screenings</h2>");
    if data.screenings_by_status.is_empty() {
        html.push_str("<p class=\"muted\">No screenings on record.</p>");
    } else {
        for (status, lines) in &data.screenings_by_status {
            let _ = write!(html, "<h3>{:?} ({})</h3><table>", status, lines.len());
            html.push_str("<tr><th>Screening</th><th>Last Completed</th><th>Next Due</th></tr>");
            for line in lines {
                let _ = write!(
                    html,
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&line.screening_type_name),
                    line.last_completed.map(|d| d.to_string()).unwrap_or_else(|| "&mdash;".to_string()),
                    line.next_due.map(|d| d.to_string()).unwrap_or_else(|| "&mdash;".to_string()),
                );
            }
            html.push_str("</table>");
        }
    }

    html.push_str("<h2>Recent Documents</h2>");
    if data.recent_documents.is_empty() {
        html.push_str("<p class=\"muted\">No documents within the configured cut-off windows.</p>");
    } else {
        html.push_str("<table><tr><th>Document</th><th>Category</th><th>Date</th></tr>");
        for doc in &data.recent_documents {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&doc.safe_title),
                escape(doc.category),
                doc.document_date
            );
        }
        html.push_str("</table>");
    }

    html.push_str("<h2>Upcoming Appointments</h2>");
    if data.upcoming_appointments.is_empty() {
        html.push_str("<p class=\"muted\">No appointments in the prioritization window.</p>");
    } else {
        html.push_str("<table><tr><th>Date</th><th>Type</th></tr>");
        for appt in &data.upcoming_appointments {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                appt.scheduled_at.format("%Y-%m-%d %H:%M"),
                escape(&appt.appointment_type)
            );
        }
        html.push_str("</table>");
    }

    html.push_str("</body></html>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prep_sheet::compile::PrepSheetDemographics;
    use chrono::NaiveDate;
    use shared::domain::entities::healthprep::Sex;
    use uuid::Uuid;

    #[test]
    fn renders_empty_sections_without_panicking() {
        let data = PrepSheetData {
            patient_id: Uuid::new_v4(),
            demographics: PrepSheetDemographics {
                name: "Jane <Doe>".to_string(),
                mrn: "MRN-1".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
                age_years: 56,
                sex: Sex::Female,
            },
            screenings_by_status: Vec::new(),
            recent_documents: Vec::new(),
            upcoming_appointments: Vec::new(),
        };
        let html = render_html(&data, "Test Clinic", Utc::now());
        assert!(html.contains("Jane &lt;Doe&gt;"));
        assert!(html.contains("No screenings on record."));
    }
}
