// Native text first, raster + OCR when the text layer is too thin
//
// Native extraction is cheap and exact when a real text layer exists. Scanned
// documents carry little or no text layer, so anything under the configured
// threshold is rasterized and OCR'd, and the OCR text is appended to whatever
// the text layer did yield.

use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::lopdf_helper;
use super::ocr_engine::OcrProvider;
use super::page_renderer::PageRasterizer;
use super::TextSource;
use crate::config::ExtractionSettings;
use crate::error::ExtractionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    Native,
    NativeWithOcr,
}

#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub text: String,
    pub method: ExtractionMethod,
    pub ocr_pages: usize,
    pub extraction_time_ms: u64,
}

pub struct DocumentTextExtractor {
    rasterizer: Box<dyn PageRasterizer>,
    ocr: Arc<dyn OcrProvider>,
    ocr_threshold: usize,
}

impl DocumentTextExtractor {
    pub fn new(rasterizer: Box<dyn PageRasterizer>, ocr: Arc<dyn OcrProvider>, ocr_threshold: usize) -> Self {
        Self {
            rasterizer,
            ocr,
            ocr_threshold,
        }
    }

    pub fn from_settings(settings: &ExtractionSettings, rasterizer: Box<dyn PageRasterizer>, ocr: Arc<dyn OcrProvider>) -> Self {
        Self::new(rasterizer, ocr, settings.ocr_threshold)
    }

    /// Extracted text, or an empty string when nothing could be recovered.
    pub fn extract(&self, pdf_path: &Path) -> String {
        self.extract_detailed(pdf_path).text
    }

    pub fn extract_detailed(&self, pdf_path: &Path) -> ExtractionOutcome {
        let start = Instant::now();

        let mut text = match lopdf_helper::extract_native_text(pdf_path) {
            Ok(text) => text,
            Err(e) => {
                warn!("native extraction failed for {}: {}", pdf_path.display(), e);
                String::new()
            }
        };

        let native_chars = text.trim().chars().count();
        if native_chars >= self.ocr_threshold {
            return ExtractionOutcome {
                text,
                method: ExtractionMethod::Native,
                ocr_pages: 0,
                extraction_time_ms: start.elapsed().as_millis() as u64,
            };
        }

        info!(
            "🔍 {} has {} native chars (< {}), using OCR",
            pdf_path.display(),
            native_chars,
            self.ocr_threshold
        );
        let pages = match self.rasterizer.rasterize(pdf_path) {
            Ok(pages) => pages,
            Err(e) => {
                warn!("rasterization failed for {}: {}", pdf_path.display(), e);
                Vec::new()
            }
        };

        let mut ocr_pages = 0;
        for (index, page) in pages.iter().enumerate() {
            match self.ocr_page(page) {
                Ok(page_text) if !page_text.is_empty() => {
                    text.push('\n');
                    text.push_str(&page_text);
                    ocr_pages += 1;
                }
                Ok(_) => debug!("page {} of {}: OCR found no text", index + 1, pdf_path.display()),
                Err(e) => warn!("page {} of {}: OCR failed: {}", index + 1, pdf_path.display(), e),
            }
        }

        ExtractionOutcome {
            text,
            method: ExtractionMethod::NativeWithOcr,
            ocr_pages,
            extraction_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn ocr_page(&self, page: &RgbImage) -> Result<String, ExtractionError> {
        let regions = self.ocr.read_text(page)?;
        Ok(regions
            .into_iter()
            .map(|region| region.text)
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

impl TextSource for DocumentTextExtractor {
    fn extract_text(&self, pdf_path: &Path) -> String {
        self.extract(pdf_path)
    }
}
