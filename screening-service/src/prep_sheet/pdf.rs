//! §4.6 "convert to PDF" — no PDF-rendering crate exists anywhere in this stack's
//! dependency tree, so (mirroring the `OcrBackend` seam in `phi_filter::ocr`) the
//! actual rasterization engine is an infrastructure concern wired in at the call
//! site; this module owns only the trait boundary.

use shared::shared::AppResult;

/// A pluggable HTML-to-PDF backend. Implementations live in infrastructure.
pub trait PdfRenderer: Send + Sync {
    fn render(&self, html: &str) -> AppResult<Vec<u8>>;
}
