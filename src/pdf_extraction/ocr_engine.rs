// OCR engine module - tesseract CLI with paragraph grouping
use image::{ImageFormat, RgbImage};
use serde::{Deserialize, Serialize};
use std::process::Command;
use tracing::{debug, info};

use crate::error::ExtractionError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrRegion {
    /// left, top, right, bottom in raster pixels
    pub bbox: [u32; 4],
    pub text: String,
    pub confidence: f32,
}

/// Reads text regions out of a raster image.
///
/// Built once at startup and shared read-only between extractions.
pub trait OcrProvider: Send + Sync {
    fn read_text(&self, image: &RgbImage) -> Result<Vec<OcrRegion>, ExtractionError>;
}

/// Stand-in used when no OCR engine is installed; scanned PDFs yield no text.
pub struct DisabledOcr;

impl OcrProvider for DisabledOcr {
    fn read_text(&self, _image: &RgbImage) -> Result<Vec<OcrRegion>, ExtractionError> {
        Ok(Vec::new())
    }
}

pub struct TesseractOcr {
    binary: String,
    language: String,
    dpi: Option<u32>,
}

impl TesseractOcr {
    /// Checks the binary runs and has traineddata for `language`.
    pub fn new(binary: impl Into<String>, language: impl Into<String>) -> Result<Self, ExtractionError> {
        let binary = binary.into();
        let language = language.into();

        let output = Command::new(&binary)
            .arg("--list-langs")
            .output()
            .map_err(|e| ExtractionError::Tool {
                tool: binary.clone(),
                message: e.to_string(),
            })?;
        // Older releases print the list on stderr.
        let listing = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        if !listing.lines().any(|line| line.trim() == language) {
            return Err(ExtractionError::Tool {
                tool: binary,
                message: format!("language '{}' not installed", language),
            });
        }

        info!("OCR engine ready: {} ({})", binary, language);
        Ok(Self {
            binary,
            language,
            dpi: None,
        })
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }
}

impl OcrProvider for TesseractOcr {
    fn read_text(&self, image: &RgbImage) -> Result<Vec<OcrRegion>, ExtractionError> {
        let raster = tempfile::Builder::new().suffix(".png").tempfile()?;
        image.save_with_format(raster.path(), ImageFormat::Png)?;

        let mut command = Command::new(&self.binary);
        command.arg(raster.path()).arg("stdout").arg("-l").arg(&self.language);
        if let Some(dpi) = self.dpi {
            command.arg("--dpi").arg(dpi.to_string());
        }
        command.arg("tsv");

        let output = command.output().map_err(|e| ExtractionError::Tool {
            tool: self.binary.clone(),
            message: e.to_string(),
        })?;
        if !output.status.success() {
            return Err(ExtractionError::Tool {
                tool: self.binary.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let regions = parse_tsv(&String::from_utf8_lossy(&output.stdout));
        debug!("OCR produced {} paragraph regions", regions.len());
        Ok(regions)
    }
}

/// Group tesseract TSV word rows into one region per (page, block, paragraph).
pub fn parse_tsv(tsv: &str) -> Vec<OcrRegion> {
    struct Paragraph {
        key: (u32, u32, u32),
        words: Vec<String>,
        bbox: [u32; 4],
        confidences: Vec<f32>,
    }

    let mut paragraphs: Vec<Paragraph> = Vec::new();

    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 || cols[0] != "5" {
            continue;
        }
        let word = cols[11].trim();
        if word.is_empty() {
            continue;
        }
        let num = |i: usize| cols[i].trim().parse::<u32>().unwrap_or(0);
        let key = (num(1), num(2), num(3));
        let (left, top, width, height) = (num(6), num(7), num(8), num(9));
        let confidence = cols[10].trim().parse::<f32>().unwrap_or(-1.0);

        let paragraph = match paragraphs.iter_mut().position(|p| p.key == key) {
            Some(index) => &mut paragraphs[index],
            None => {
                paragraphs.push(Paragraph {
                    key,
                    words: Vec::new(),
                    bbox: [left, top, left + width, top + height],
                    confidences: Vec::new(),
                });
                let last = paragraphs.len() - 1;
                &mut paragraphs[last]
            }
        };

        paragraph.words.push(word.to_string());
        paragraph.bbox = [
            paragraph.bbox[0].min(left),
            paragraph.bbox[1].min(top),
            paragraph.bbox[2].max(left + width),
            paragraph.bbox[3].max(top + height),
        ];
        if confidence >= 0.0 {
            paragraph.confidences.push(confidence);
        }
    }

    paragraphs
        .into_iter()
        .map(|p| {
            let confidence = if p.confidences.is_empty() {
                0.0
            } else {
                p.confidences.iter().sum::<f32>() / p.confidences.len() as f32 / 100.0
            };
            OcrRegion {
                bbox: p.bbox,
                text: p.words.join(" "),
                confidence,
            }
        })
        .collect()
}
