// Identity number and name matching over extracted document text
//
// Exact tests run first; the tolerant fallbacks absorb OCR noise:
// - identity: a label ("cc", "cedula", ...) followed by the last digits
// - name: any two tokens anywhere, then the whole name as a phrase

use regex::Regex;
use std::collections::HashSet;
use serde::Serialize;
use tracing::warn;

use crate::config::MatchSettings;
use crate::error::MatchError;
use crate::text_normalizer::normalize;

/// Labels that may precede an identity number, in normalized form.
pub const IDENTITY_LABELS: &[&str] = &["cc", "cedula", "documento", "identificacion"];

/// Tokens that must be found independently for the scattered name test.
const SCATTERED_TOKENS_REQUIRED: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub identity_found: bool,
    pub name_found: bool,
}

impl MatchOutcome {
    pub fn any(&self) -> bool {
        self.identity_found || self.name_found
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchEngine {
    settings: MatchSettings,
}

impl MatchEngine {
    pub fn new(settings: MatchSettings) -> Self {
        Self { settings }
    }

    /// One-off match. Never fails; an internal error counts as a non-match.
    pub fn match_text(&self, text: &str, identity_number: &str, full_name: &str) -> MatchOutcome {
        match self.compile(identity_number, full_name) {
            Ok(query) => query.match_text(text),
            Err(e) => {
                warn!("matching aborted, treating document as non-match: {}", e);
                MatchOutcome::default()
            }
        }
    }

    /// Build the patterns for one student so they can be run over many documents.
    pub fn compile(&self, identity_number: &str, full_name: &str) -> Result<CompiledQuery, MatchError> {
        let identity_digits = digits_only(&normalize(identity_number));

        let suffix_len = self.settings.suffix_digits;
        let identity_label = if suffix_len == 0 || identity_digits.len() < suffix_len {
            None
        } else {
            let suffix = &identity_digits[identity_digits.len() - suffix_len..];
            Some(Regex::new(&format!(
                r"(?i)(?:{})\D*{}",
                IDENTITY_LABELS.join("|"),
                suffix
            ))?)
        };

        let norm_name = normalize(full_name);
        let name_tokens: Vec<String> = norm_name.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect();
        let name = if name_tokens.len() < self.settings.min_name_tokens.max(SCATTERED_TOKENS_REQUIRED) {
            None
        } else {
            let escaped: Vec<String> = name_tokens.iter().map(|t| regex::escape(t)).collect();
            Some(NamePatterns {
                any_token: Regex::new(&format!(r"\b(?:{})\b", escaped.join("|")))?,
                phrase: Regex::new(&format!(r"\b{}\b", escaped.join(r"\s+")))?,
                tokens: name_tokens,
            })
        };

        Ok(CompiledQuery {
            identity_digits,
            identity_label,
            name,
        })
    }
}

#[derive(Debug, Clone)]
struct NamePatterns {
    tokens: Vec<String>,
    /// Any single token as a whole word.
    any_token: Regex,
    /// All tokens in order, whitespace separated.
    phrase: Regex,
}

/// Identity and name patterns of one student, ready to run over any number of documents.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    identity_digits: String,
    identity_label: Option<Regex>,
    name: Option<NamePatterns>,
}

impl CompiledQuery {
    pub fn match_text(&self, text: &str) -> MatchOutcome {
        let norm_text = normalize(text);
        if norm_text.is_empty() {
            return MatchOutcome::default();
        }

        MatchOutcome {
            identity_found: self.identity_present(&norm_text),
            name_found: self.name_present(&norm_text),
        }
    }

    fn identity_present(&self, norm_text: &str) -> bool {
        if self.identity_digits.is_empty() {
            return false;
        }
        if digits_only(norm_text).contains(&self.identity_digits) {
            return true;
        }
        self.identity_label.as_ref().is_some_and(|label| label.is_match(norm_text))
    }

    fn name_present(&self, norm_text: &str) -> bool {
        let Some(name) = &self.name else {
            return false;
        };

        let seen: HashSet<&str> = name.any_token.find_iter(norm_text).map(|m| m.as_str()).collect();
        let scattered = name.tokens.iter().filter(|t| seen.contains(t.as_str())).count();
        scattered >= SCATTERED_TOKENS_REQUIRED || name.phrase.is_match(norm_text)
    }
}

fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const NAME: &str = "Nicolle Alejandra Gonzalez Rodriguez";
    const ID: &str = "1032508266";

    fn engine() -> MatchEngine {
        MatchEngine::new(MatchSettings::default())
    }

    #[rstest]
    #[case("REPUBLICA DE COLOMBIA\nC.C. 1032508266", true)]
    #[case("Identificación: 1.032.508.266", true)]
    #[case("cedula de ciudadania no xxxxxx8266", true)]
    #[case("DOCUMENTO -- ilegible -- 8266", true)]
    #[case("numero 8266 sin etiqueta", false)]
    #[case("C.C. 1032 5 0 8 2 6 7", false)]
    #[case("", false)]
    fn test_identity_matching(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(engine().match_text(text, ID, NAME).identity_found, expected);
    }

    #[test]
    fn test_identity_suffix_needs_enough_digits() {
        let outcome = engine().match_text("cc 266", "266", "");
        assert!(outcome.identity_found, "exact containment still applies");

        let outcome = engine().match_text("cc 9266", "12", "");
        assert!(!outcome.identity_found);
    }

    #[test]
    fn test_identity_without_digits_never_matches() {
        assert!(!engine().match_text("cc 1234", "abc", "").identity_found);
    }

    #[rstest]
    #[case("NICOLLE\nfirma del aprendiz\nRODRIGUEZ", true)]
    #[case("aprendiz: gonzalez rodriguez nicolle", true)]
    #[case("Sra. NICOLLE", false)]
    #[case("NICOLLEX RODRIGUEZA", false)]
    fn test_name_matching(#[case] text: &str, #[case] expected: bool) {
        assert_eq!(engine().match_text(text, "0000", NAME).name_found, expected);
    }

    #[test]
    fn test_single_token_name_never_matches() {
        assert!(!engine().match_text("madonna", ID, "Madonna").name_found);
    }

    #[test]
    fn test_compiled_query_is_reusable_across_documents() {
        let query = engine().compile(ID, NAME).unwrap();
        let documents = [
            ("C.C. 1032508266", true, false),
            ("acta de otro aprendiz 99999999", false, false),
            ("aprendiz NICOLLE GONZALEZ", false, true),
            ("identificacion ***8266 rodriguez nicolle", true, true),
        ];

        for (text, identity, name) in documents {
            let outcome = query.match_text(text);
            assert_eq!(outcome, engine().match_text(text, ID, NAME), "text {:?}", text);
            assert_eq!((outcome.identity_found, outcome.name_found), (identity, name), "text {:?}", text);
        }
    }

    #[test]
    fn test_accented_name_matches_plain_text() {
        let outcome = engine().match_text("MARIA JOSE PEREZ", ID, "María José Pérez");
        assert!(outcome.name_found);
        assert!(outcome.any());
    }
}
