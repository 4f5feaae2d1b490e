// PDF extraction module
use std::path::Path;

pub mod extraction_router;
pub mod lopdf_helper;
pub mod ocr_engine;
pub mod page_renderer;

pub use extraction_router::{DocumentTextExtractor, ExtractionMethod, ExtractionOutcome};
pub use ocr_engine::{DisabledOcr, OcrProvider, OcrRegion, TesseractOcr};
pub use page_renderer::{PageRasterizer, PdftoppmRasterizer};

/// Anything that can turn a document on disk into plain text.
///
/// Implementations never fail: unreadable documents yield an empty string.
pub trait TextSource {
    fn extract_text(&self, pdf_path: &Path) -> String;
}
