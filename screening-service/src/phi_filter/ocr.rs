//! §4.4 "OCR": text/PDF/image attachments in, extracted text out. The actual
//! rasterization/OCR backends are infrastructure concerns left to whatever engine is
//! wired in at the call site (the teacher's own OCR integration is out of scope for
//! this crate's test surface); this module owns the decision tree and the
//! confidence-floor policy, which is testable without a real OCR engine.

use tracing::warn;

/// §4.4: "(text, confidence, method, pages)".
#[derive(Debug, Clone, PartialEq)]
pub struct OcrResult {
    pub text: String,
    pub confidence: f64,
    pub method: ExtractionMethod,
    pub pages: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    PlainText,
    EmbeddedPdfText,
    RasterizedOcr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Pdf,
    Image,
}

/// Below this confidence the extraction is treated as failed (`ocr_failed`) even
/// though bytes came back, since a low-confidence OCR pass is worse than none: it
/// would feed noise into the keyword matcher (§4.1.3).
pub const CONFIDENCE_FLOOR: f64 = 0.55;

/// A pluggable backend: given raw bytes and their declared kind, produce an
/// `OcrResult`. Implementations live in infrastructure; this trait is the seam the
/// pipeline tests against with a fake.
pub trait OcrBackend: Send + Sync {
    fn extract_embedded_pdf_text(&self, bytes: &[u8]) -> Option<String>;
    fn rasterize_and_ocr(&self, bytes: &[u8], kind: ContentKind) -> OcrResult;
}

/// §4.4 decision tree: text attachments are used verbatim; PDFs try embedded text
/// first, then rasterise+OCR page-by-page; images go straight to OCR.
pub fn extract(backend: &dyn OcrBackend, bytes: &[u8], kind: ContentKind) -> Option<OcrResult> {
    let result = match kind {
        ContentKind::Text => OcrResult {
            text: String::from_utf8_lossy(bytes).into_owned(),
            confidence: 1.0,
            method: ExtractionMethod::PlainText,
            pages: 1,
        },
        ContentKind::Pdf => match backend.extract_embedded_pdf_text(bytes) {
            Some(text) if !text.trim().is_empty() => OcrResult {
                text,
                confidence: 1.0,
                method: ExtractionMethod::EmbeddedPdfText,
                pages: 1,
            },
            _ => backend.rasterize_and_ocr(bytes, kind),
        },
        ContentKind::Image => backend.rasterize_and_ocr(bytes, kind),
    };

    if result.confidence < CONFIDENCE_FLOOR {
        warn!(confidence = result.confidence, method = ?result.method, "ocr_failed: result below confidence floor");
        return None;
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeBackend {
        embedded_text: Option<String>,
        rasterized: OcrResult,
    }

    impl OcrBackend for FakeBackend {
        fn extract_embedded_pdf_text(&self, _bytes: &[u8]) -> Option<String> {
            self.embedded_text.clone()
        }
        fn rasterize_and_ocr(&self, _bytes: &[u8], _kind: ContentKind) -> OcrResult {
            self.rasterized.clone()
        }
    }

    #[test]
    fn text_attachments_are_used_verbatim() {
        let backend = FakeBackend {
            embedded_text: None,
            rasterized: OcrResult {
                text: String::new(),
                confidence: 0.0,
                method: ExtractionMethod::RasterizedOcr,
                pages: 0,
            },
        };
        let result = extract(&backend, b"plain mammogram report", ContentKind::Text).unwrap();
        assert_eq!(result.method, ExtractionMethod::PlainText);
        assert_eq!(result.text, "plain mammogram report");
    }

    #[test]
    fn pdf_prefers_embedded_text_when_present() {
        let backend = FakeBackend {
            embedded_text: Some("embedded report text".to_string()),
            rasterized: OcrResult {
                text: "should not be used".into(),
                confidence: 0.9,
                method: ExtractionMethod::RasterizedOcr,
                pages: 1,
            },
        };
        let result = extract(&backend, b"%PDF-1.4", ContentKind::Pdf).unwrap();
        assert_eq!(result.method, ExtractionMethod::EmbeddedPdfText);
        assert_eq!(result.text, "embedded report text");
    }

    #[test]
    fn pdf_falls_back_to_rasterized_ocr_when_no_embedded_text() {
        let backend = FakeBackend {
            embedded_text: None,
            rasterized: OcrResult {
                text: "ocr text".into(),
                confidence: 0.8,
                method: ExtractionMethod::RasterizedOcr,
                pages: 2,
            },
        };
        let result = extract(&backend, b"%PDF-1.4", ContentKind::Pdf).unwrap();
        assert_eq!(result.method, ExtractionMethod::RasterizedOcr);
    }

    #[test]
    fn low_confidence_result_is_treated_as_failure() {
        let backend = FakeBackend {
            embedded_text: None,
            rasterized: OcrResult {
                text: "garbled".into(),
                confidence: 0.2,
                method: ExtractionMethod::RasterizedOcr,
                pages: 1,
            },
        };
        assert!(extract(&backend, b"image-bytes", ContentKind::Image).is_none());
    }
}
