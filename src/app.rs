// Wiring: builds the engine graph from Settings once at startup
use std::sync::Arc;
use tracing::warn;

use crate::config::Settings;
use crate::conversation::ConversationEngine;
use crate::matching::MatchEngine;
use crate::pdf_extraction::{DisabledOcr, DocumentTextExtractor, OcrProvider, PdftoppmRasterizer, TesseractOcr};
use crate::storage::{DocumentPartitions, FlatFileRecords};
use crate::verification::VerificationOrchestrator;

/// The OCR engine is expensive to bring up, so it is built once and shared.
/// Without a usable engine scanned documents simply yield no text.
pub fn build_ocr(settings: &Settings) -> Arc<dyn OcrProvider> {
    let extraction = &settings.extraction;
    match TesseractOcr::new(&extraction.tesseract_bin, &extraction.ocr_language) {
        Ok(engine) => Arc::new(engine.with_dpi(extraction.raster_dpi)),
        Err(e) => {
            warn!("⚠️ OCR disabled, scanned documents will not be read: {}", e);
            Arc::new(DisabledOcr)
        }
    }
}

pub fn build_extractor(settings: &Settings, ocr: Arc<dyn OcrProvider>) -> DocumentTextExtractor {
    let extraction = &settings.extraction;
    DocumentTextExtractor::from_settings(
        extraction,
        Box::new(PdftoppmRasterizer::new(&extraction.pdftoppm_bin, extraction.raster_dpi)),
        ocr,
    )
}

pub fn build_orchestrator(settings: &Settings, ocr: Arc<dyn OcrProvider>) -> VerificationOrchestrator {
    VerificationOrchestrator::new(
        Box::new(DocumentPartitions::new(&settings.documents_dir)),
        Box::new(build_extractor(settings, ocr)),
        MatchEngine::new(settings.matching),
    )
}

pub fn build_engine(settings: &Settings, ocr: Arc<dyn OcrProvider>) -> ConversationEngine {
    ConversationEngine::new(
        Box::new(FlatFileRecords::new(&settings.database_path)),
        Box::new(build_orchestrator(settings, ocr)),
        settings.conversation,
    )
}
