// Page rasterization using pdftoppm
use image::RgbImage;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::ExtractionError;

/// Turns every page of a PDF into an RGB raster for OCR.
pub trait PageRasterizer: Send + Sync {
    /// Pages that fail to render or decode are skipped, not reported.
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<RgbImage>, ExtractionError>;
}

pub struct PdftoppmRasterizer {
    binary: String,
    dpi: u32,
}

impl PdftoppmRasterizer {
    pub fn new(binary: impl Into<String>, dpi: u32) -> Self {
        Self {
            binary: binary.into(),
            dpi,
        }
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<RgbImage>, ExtractionError> {
        let temp_dir = TempDir::new()?;
        let output_prefix = temp_dir.path().join("page");

        debug!("rasterizing {} at {} dpi", pdf_path.display(), self.dpi);
        let output = Command::new(&self.binary)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf_path)
            .arg(&output_prefix)
            .output()
            .map_err(|e| ExtractionError::Tool {
                tool: self.binary.clone(),
                message: e.to_string(),
            })?;

        let page_files = rendered_pages(temp_dir.path())?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if page_files.is_empty() {
                return Err(ExtractionError::Tool {
                    tool: self.binary.clone(),
                    message: stderr,
                });
            }
            // Broken pages are dropped by pdftoppm; the rest are still usable.
            warn!(
                "{} exited with {} on {}, keeping {} rendered pages: {}",
                self.binary,
                output.status,
                pdf_path.display(),
                page_files.len(),
                stderr
            );
        }

        let mut pages = Vec::new();
        for page_file in page_files {
            match image::open(&page_file) {
                Ok(image) => pages.push(image.to_rgb8()),
                Err(e) => warn!("skipping unreadable raster {}: {}", page_file.display(), e),
            }
        }
        Ok(pages)
    }
}

/// pdftoppm names pages `page-1.png` or `page-01.png` depending on page
/// count; the zero padding keeps lexical order equal to page order.
fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension() == Some(OsStr::new("png")))
        .collect();
    files.sort();
    Ok(files)
}
