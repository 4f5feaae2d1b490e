// Flat-file student records: pipe-delimited, one header line
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::text_normalizer::title_case;
use crate::types::{StudentRecord, RECORD_FIELD_COUNT};

pub const HEADER: &str =
    "TipoDocumento|NumeroDocumento|Nombres|Apellido1|Apellido2|Ficha|Codigo|VersionPrograma|Programa|NivelFormacion";

/// Fictional rows written by `init` so a fresh install has something to query.
const SAMPLE_ROWS: &[&str] = &[
    "CC|1000000001|ANA LUCIA|PEREZ|GOMEZ|2944777|233108|1|SISTEMAS TELEINFORMÁTICOS|TÉCNICO",
    "CC|1000000002|CARLOS ANDRES|MARTINEZ|DIAZ|2944777|233108|1|SISTEMAS TELEINFORMÁTICOS|TÉCNICO",
    "TI|1000000003|VALENTINA|RUIZ|CASTRO|2944777|233108|1|SISTEMAS TELEINFORMÁTICOS|TÉCNICO",
];

/// Resolves an identity number to a student.
pub trait RecordLookup {
    fn lookup(&self, identity_number: &str) -> Option<StudentRecord>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriterion {
    Identity(String),
    Name(String),
    ProgramCode(String),
}

/// Read-only snapshot of the record file.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: HashMap<String, StudentRecord>,
}

impl RecordStore {
    pub fn from_records(records: impl IntoIterator<Item = StudentRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.identity_number.clone(), r))
                .collect(),
        }
    }

    /// Parse the flat format. The first line is always the header; short
    /// lines are skipped.
    pub fn parse<R: Read>(reader: R) -> Self {
        let mut records = HashMap::new();

        for (index, line) in BufReader::new(reader).lines().enumerate().skip(1) {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!("record line {} unreadable: {}", index + 1, e);
                    continue;
                }
            };
            match parse_line(&line) {
                Some(record) => {
                    records.insert(record.identity_number.clone(), record);
                }
                None if line.trim().is_empty() => {}
                None => debug!("skipping malformed record line {}", index + 1),
            }
        }

        Self { records }
    }

    pub fn load(path: &Path) -> Result<Self, StorageError> {
        let file = std::fs::File::open(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(file))
    }

    /// An unreadable record file behaves like an empty one.
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("⚠️ record store unavailable, continuing empty: {}", e);
            Self::default()
        })
    }

    pub fn get(&self, identity_number: &str) -> Option<&StudentRecord> {
        self.records.get(identity_number)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Results are ordered by identity number.
    pub fn search(&self, criterion: &SearchCriterion) -> Vec<&StudentRecord> {
        let mut results: Vec<&StudentRecord> = match criterion {
            SearchCriterion::Identity(id) => return self.get(id.trim()).into_iter().collect(),
            SearchCriterion::Name(name) => {
                let needle = name.trim().to_lowercase();
                self.records
                    .values()
                    .filter(|r| r.full_name().to_lowercase().contains(&needle))
                    .collect()
            }
            SearchCriterion::ProgramCode(code) => self
                .records
                .values()
                .filter(|r| r.program_code == code.trim())
                .collect(),
        };
        results.sort_by(|a, b| a.identity_number.cmp(&b.identity_number));
        results
    }
}

impl RecordLookup for RecordStore {
    fn lookup(&self, identity_number: &str) -> Option<StudentRecord> {
        self.get(identity_number).cloned()
    }
}

/// Record file re-read on every lookup, so edits show up without a restart.
#[derive(Debug, Clone)]
pub struct FlatFileRecords {
    path: PathBuf,
}

impl FlatFileRecords {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn snapshot(&self) -> RecordStore {
        RecordStore::load_or_empty(&self.path)
    }
}

impl RecordLookup for FlatFileRecords {
    fn lookup(&self, identity_number: &str) -> Option<StudentRecord> {
        self.snapshot().lookup(identity_number)
    }
}

fn parse_line(line: &str) -> Option<StudentRecord> {
    let parts: Vec<&str> = line.trim().split('|').map(str::trim).collect();
    if parts.len() < RECORD_FIELD_COUNT || parts[1].is_empty() {
        return None;
    }

    Some(StudentRecord {
        document_type: parts[0].to_string(),
        identity_number: parts[1].to_string(),
        names: title_case(parts[2]),
        surname1: title_case(parts[3]),
        surname2: title_case(parts[4]),
        cohort: parts[5].to_string(),
        program_code: parts[6].to_string(),
        program_version: parts[7].to_string(),
        program_name: title_case(parts[8]),
        training_level: title_case(parts[9]),
    })
}

/// Write a header plus sample rows if the record file does not exist yet.
/// Returns whether a file was created.
pub fn seed_database(path: &Path) -> Result<bool, StorageError> {
    if path.exists() {
        return Ok(false);
    }
    let io_err = |source: std::io::Error| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in SAMPLE_ROWS {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(path, contents).map_err(io_err)?;
    Ok(true)
}
