// lopdf helper - native text layer extraction
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ExtractionError;

/// Load a PDF document using lopdf
pub fn load_pdf(path: &Path) -> Result<Document, ExtractionError> {
    Ok(Document::load(path)?)
}

/// Concatenate the text layer of every page, one trailing newline per page.
///
/// A page whose content stream cannot be decoded contributes nothing.
pub fn extract_native_text(path: &Path) -> Result<String, ExtractionError> {
    let document = load_pdf(path)?;
    let mut text = String::new();

    for page_number in document.get_pages().keys() {
        match document.extract_text(&[*page_number]) {
            Ok(page_text) => {
                if !page_text.is_empty() {
                    text.push_str(&page_text);
                    text.push('\n');
                }
            }
            Err(e) => warn!("page {} of {}: text layer unreadable: {}", page_number, path.display(), e),
        }
    }

    debug!("native text layer of {}: {} chars", path.display(), text.trim().chars().count());
    Ok(text)
}
