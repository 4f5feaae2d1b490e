// Core types for docverify
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of pipe-delimited fields in a record line.
pub const RECORD_FIELD_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub document_type: String,
    pub identity_number: String,
    pub names: String,
    pub surname1: String,
    pub surname2: String,
    pub cohort: String,
    pub program_code: String,
    pub program_version: String,
    pub program_name: String,
    pub training_level: String,
}

impl StudentRecord {
    pub fn full_name(&self) -> String {
        [self.names.as_str(), self.surname1.as_str(), self.surname2.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The three documents a student must have on file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Identity,
    EnrollmentCertificate,
    Evaluation,
}

impl DocumentCategory {
    /// Search order.
    pub const ALL: [DocumentCategory; 3] = [
        DocumentCategory::Identity,
        DocumentCategory::EnrollmentCertificate,
        DocumentCategory::Evaluation,
    ];

    /// Storage partition directory name.
    pub fn dir_name(&self) -> &'static str {
        match self {
            DocumentCategory::Identity => "cedulas",
            DocumentCategory::EnrollmentCertificate => "actas",
            DocumentCategory::Evaluation => "evaluaciones",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentCategory::Identity => "Documento de Identidad",
            DocumentCategory::EnrollmentCertificate => "Formato F-023",
            DocumentCategory::Evaluation => "Evaluación Etapa Productiva",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub found: BTreeMap<DocumentCategory, bool>,
    pub trace: Vec<String>,
}

impl VerificationResult {
    pub fn is_found(&self, category: DocumentCategory) -> bool {
        self.found.get(&category).copied().unwrap_or(false)
    }

    /// Categories not found, in search order.
    pub fn missing(&self) -> Vec<DocumentCategory> {
        DocumentCategory::ALL
            .into_iter()
            .filter(|category| !self.is_found(*category))
            .collect()
    }

    pub fn all_present(&self) -> bool {
        self.missing().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> StudentRecord {
        StudentRecord {
            document_type: "CC".into(),
            identity_number: "1032508266".into(),
            names: "Nicolle Alejandra".into(),
            surname1: "Gonzalez".into(),
            surname2: "Rodriguez".into(),
            cohort: "2944777".into(),
            program_code: "233108".into(),
            program_version: "1".into(),
            program_name: "Sistemas Teleinformáticos".into(),
            training_level: "Técnico".into(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(record().full_name(), "Nicolle Alejandra Gonzalez Rodriguez");

        let mut single_surname = record();
        single_surname.surname2.clear();
        assert_eq!(single_surname.full_name(), "Nicolle Alejandra Gonzalez");
    }

    #[test]
    fn test_missing_follows_search_order() {
        let mut result = VerificationResult::default();
        result.found.insert(DocumentCategory::EnrollmentCertificate, true);

        assert_eq!(
            result.missing(),
            vec![DocumentCategory::Identity, DocumentCategory::Evaluation]
        );
        assert!(!result.all_present());
    }
}
