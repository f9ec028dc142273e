//! §4.6 "Prep-Sheet Generator & Write-Back": compile per-patient output, render to
//! HTML/PDF, and post the result back to the EMR as a `DocumentReference`.

pub mod compile;
pub mod pdf;
pub mod render;
pub mod write_back;

pub use compile::{
    AppointmentLine, DocumentLine, PrepSheetCompiler, PrepSheetData, PrepSheetDemographics,
    ScreeningLine,
};
pub use pdf::PdfRenderer;
pub use render::render_html;
pub use write_back::{PrepSheetWriteBack, WriteBackResult, WRITE_BACK_LOINC_CODE};
