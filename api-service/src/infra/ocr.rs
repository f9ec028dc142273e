//! Concrete `OcrBackend` wiring. No OCR/PDF-text-extraction crate exists anywhere in
//! this workspace's dependency tree (mirroring the teacher's own KMS vendor stubs in
//! `shared::infrastructure::encryption::vault_impl`), so this backend is a
//! placeholder: embedded-PDF-text extraction and rasterized OCR both report a
//! below-floor result rather than panicking, which routes attachments through the
//! pipeline's existing `ocr_failed` path (§4.4) instead of blocking ingestion.

use screening_service::phi_filter::{ContentKind, OcrBackend, OcrResult};
use screening_service::phi_filter::ocr::ExtractionMethod;

pub struct UnavailableOcrBackend;

impl OcrBackend for UnavailableOcrBackend {
    fn extract_embedded_pdf_text(&self, _bytes: &[u8]) -> Option<String> {
        // TODO: wire a real PDF text-extraction crate once one is approved for this
        // workspace's dependency tree.
        None
    }

    fn rasterize_and_ocr(&self, _bytes: &[u8], _kind: ContentKind) -> OcrResult {
        OcrResult {
            text: String::new(),
            confidence: 0.0,
            method: ExtractionMethod::RasterizedOcr,
            pages: 0,
        }
    }
}
