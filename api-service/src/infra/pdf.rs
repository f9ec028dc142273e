//! Concrete `PdfRenderer` wiring. No HTML-to-PDF crate exists anywhere in this
//! workspace's dependency tree, so rendering degrades to emitting the prep sheet's
//! HTML as the "PDF" payload rather than failing the job outright — write-back is
//! gated behind `tenant.write_back_dry_run` (default `true`) until a real renderer is
//! wired in, so this placeholder never reaches Epic in practice.

use screening_service::prep_sheet::PdfRenderer;
use shared::shared::AppResult;

pub struct HtmlPassthroughPdfRenderer;

impl PdfRenderer for HtmlPassthroughPdfRenderer {
    fn render(&self, html: &str) -> AppResult<Vec<u8>> {
        // TODO: wire a real HTML-to-PDF crate once one is approved for this
        // workspace's dependency tree; until then the "PDF" bytes are the rendered
        // HTML verbatim.
        Ok(html.as_bytes().to_vec())
    }
}
