//! Vendor-boundary adapters wired at the outermost layer: concrete implementations
//! of the trait seams `screening-service` leaves open for infrastructure.

pub mod ocr;
pub mod pdf;

pub use ocr::UnavailableOcrBackend;
pub use pdf::HtmlPassthroughPdfRenderer;
