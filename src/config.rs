// Configuration for docverify: defaults, optional TOML file, env overrides
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

// Extraction knobs
pub const DEFAULT_OCR_THRESHOLD: usize = 100;
pub const DEFAULT_RASTER_DPI: u32 = 300;
pub const DEFAULT_OCR_LANGUAGE: &str = "spa";

// Matching knobs
pub const DEFAULT_SUFFIX_DIGITS: usize = 4;
pub const DEFAULT_MIN_NAME_TOKENS: usize = 2;

// Identity number bounds accepted by the conversation
pub const IDENTITY_MIN_LEN: usize = 8;
pub const IDENTITY_MAX_LEN: usize = 10;

pub const ENV_DATABASE: &str = "DOCVERIFY_DATABASE";
pub const ENV_DOCUMENTS: &str = "DOCVERIFY_DOCUMENTS";
pub const ENV_OCR_LANG: &str = "DOCVERIFY_OCR_LANG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub documents_dir: PathBuf,
    pub extraction: ExtractionSettings,
    pub matching: MatchSettings,
    pub conversation: ConversationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Trimmed native text shorter than this triggers the OCR fallback.
    pub ocr_threshold: usize,
    pub raster_dpi: u32,
    pub ocr_language: String,
    pub pdftoppm_bin: String,
    pub tesseract_bin: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatchSettings {
    /// Length of the identity suffix used by the label-tolerant fallback.
    pub suffix_digits: usize,
    pub min_name_tokens: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConversationSettings {
    pub identity_min_len: usize,
    pub identity_max_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("database.txt"),
            documents_dir: PathBuf::from("documentos"),
            extraction: ExtractionSettings::default(),
            matching: MatchSettings::default(),
            conversation: ConversationSettings::default(),
        }
    }
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            ocr_threshold: DEFAULT_OCR_THRESHOLD,
            raster_dpi: DEFAULT_RASTER_DPI,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            pdftoppm_bin: "pdftoppm".to_string(),
            tesseract_bin: "tesseract".to_string(),
        }
    }
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            suffix_digits: DEFAULT_SUFFIX_DIGITS,
            min_name_tokens: DEFAULT_MIN_NAME_TOKENS,
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            identity_min_len: IDENTITY_MIN_LEN,
            identity_max_len: IDENTITY_MAX_LEN,
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file if given, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env_overrides();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(database) = env::var(ENV_DATABASE) {
            self.database_path = database.into();
        }
        if let Ok(documents) = env::var(ENV_DOCUMENTS) {
            self.documents_dir = documents.into();
        }
        if let Ok(lang) = env::var(ENV_OCR_LANG) {
            self.extraction.ocr_language = lang;
        }
    }
}
