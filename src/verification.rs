// Per-category document search with first-match short-circuit
use std::path::Path;
use tracing::{info, warn};

use crate::matching::{CompiledQuery, MatchEngine};
use crate::pdf_extraction::TextSource;
use crate::storage::PartitionProvider;
use crate::types::{DocumentCategory, VerificationResult};

/// Decides which required documents a student has on file.
pub trait DocumentVerifier {
    fn verify(&self, identity_number: &str, full_name: &str) -> VerificationResult;
}

pub struct VerificationOrchestrator {
    partitions: Box<dyn PartitionProvider>,
    extractor: Box<dyn TextSource>,
    matcher: MatchEngine,
}

impl VerificationOrchestrator {
    pub fn new(partitions: Box<dyn PartitionProvider>, extractor: Box<dyn TextSource>, matcher: MatchEngine) -> Self {
        Self {
            partitions,
            extractor,
            matcher,
        }
    }

    fn scan_category(
        &self,
        category: DocumentCategory,
        query: Option<&CompiledQuery>,
        trace: &mut Vec<String>,
    ) -> bool {
        let dir = self.partitions.location(category);
        trace.push(format!("🔍 Buscando en {}...", dir.display()));

        let files = match self.partitions.list_pdf_files(category) {
            Ok(files) => files,
            Err(e) => {
                warn!("{}", e);
                trace.push(format!("⚠️ Directorio no encontrado: {}", dir.display()));
                return false;
            }
        };

        for file in &files {
            let name = display_name(file);
            trace.push(format!("📄 Revisando {}", name));

            let text = self.extractor.extract_text(file);
            let outcome = query.map(|q| q.match_text(&text)).unwrap_or_default();
            if outcome.any() {
                info!("✅ {} matched in {}", category.dir_name(), name);
                trace.push(format!(
                    "✅ Coincidencia encontrada en {} (cédula {}, nombre {})",
                    name,
                    tick(outcome.identity_found),
                    tick(outcome.name_found)
                ));
                return true;
            }
        }
        false
    }
}

impl DocumentVerifier for VerificationOrchestrator {
    fn verify(&self, identity_number: &str, full_name: &str) -> VerificationResult {
        info!("🔄 verifying documents for {} ({})", full_name, identity_number);
        let mut result = VerificationResult::default();
        let query = match self.matcher.compile(identity_number, full_name) {
            Ok(query) => Some(query),
            Err(e) => {
                warn!("no usable match patterns, every document counts as a non-match: {}", e);
                None
            }
        };

        for category in DocumentCategory::ALL {
            let found = self.scan_category(category, query.as_ref(), &mut result.trace);
            result.trace.push(format!(
                "📌 Resultado para {}: {}",
                category.label(),
                if found { "ENCONTRADO" } else { "NO ENCONTRADO" }
            ));
            result.found.insert(category, found);
        }

        result
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn tick(found: bool) -> &'static str {
    if found {
        "✔"
    } else {
        "✖"
    }
}
