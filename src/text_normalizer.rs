// Text canonicalization for substring/pattern matching over OCR'd text
use unicode_normalization::UnicodeNormalization;

/// Strip diacritics, fold case, drop punctuation and collapse whitespace.
///
/// The output only ever contains `[a-z0-9]` and single spaces, so feeding it
/// back in returns the same string.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_ascii_whitespace())
        .collect();

    folded.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

/// Capitalize each word ("SISTEMAS TELEINFORMÁTICOS" -> "Sistemas Teleinformáticos").
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
