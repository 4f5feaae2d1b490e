// Per-state input classifiers producing tagged commands
//
// Every handler matches exhaustively on its command type; keyword checks live
// here and nowhere else.

use std::ops::RangeInclusive;

use once_cell::sync::Lazy;

use crate::text_normalizer::normalize;

const GREETING_KEYWORDS: &[&str] = &[
    "hola",
    "buenas",
    "buenos dias",
    "buen dia",
    "saludos",
    "que tal",
    "hello",
    "hi",
    "hey",
];

/// Greeting keywords split into words, matched as whole-word phrases.
static GREETING_PHRASES: Lazy<Vec<Vec<&'static str>>> =
    Lazy::new(|| GREETING_KEYWORDS.iter().copied().map(|k| k.split(' ').collect()).collect());

const CHECK_DOCUMENTS_KEYWORDS: &[&str] = &["1", "documento", "estado"];
const FAQ_KEYWORDS: &[&str] = &["2", "pregunta", "frecuente"];
const STAGE_INFO_KEYWORDS: &[&str] = &["3", "informacion", "etapa"];

const AFFIRMATIVE: &[&str] = &["si", "yes", "s", "1"];
const NEGATIVE: &[&str] = &["no", "n", "2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartCommand {
    Greeting,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    CheckDocuments,
    Faq,
    StageInfo,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaqCommand {
    /// 1-based FAQ entry number, already range checked.
    Select(usize),
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityCommand {
    Valid(String),
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueCommand {
    Affirmative,
    Negative,
    Unclear,
}

pub fn classify_start(input: &str) -> StartCommand {
    let text = normalize(input);
    let words: Vec<&str> = text.split(' ').filter(|w| !w.is_empty()).collect();
    let greeted = GREETING_PHRASES
        .iter()
        .any(|phrase| words.windows(phrase.len()).any(|window| window == phrase.as_slice()));
    if greeted {
        StartCommand::Greeting
    } else {
        StartCommand::Other
    }
}

/// Substring checks in menu order, so "1" wins over a later keyword.
pub fn classify_menu(input: &str) -> MenuCommand {
    let text = normalize(input);
    let hit = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

    if hit(CHECK_DOCUMENTS_KEYWORDS) {
        MenuCommand::CheckDocuments
    } else if hit(FAQ_KEYWORDS) {
        MenuCommand::Faq
    } else if hit(STAGE_INFO_KEYWORDS) {
        MenuCommand::StageInfo
    } else {
        MenuCommand::Unrecognized
    }
}

pub fn classify_faq(input: &str, entries: usize) -> FaqCommand {
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return FaqCommand::Invalid;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=entries).contains(&n) => FaqCommand::Select(n),
        _ => FaqCommand::Invalid,
    }
}

pub fn classify_identity(input: &str, length: &RangeInclusive<usize>) -> IdentityCommand {
    let input = input.trim();
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) && length.contains(&input.len()) {
        IdentityCommand::Valid(input.to_string())
    } else {
        IdentityCommand::Invalid
    }
}

pub fn classify_continue(input: &str) -> ContinueCommand {
    let answer = normalize(input);
    if AFFIRMATIVE.contains(&answer.as_str()) {
        ContinueCommand::Affirmative
    } else if NEGATIVE.contains(&answer.as_str()) {
        ContinueCommand::Negative
    } else {
        ContinueCommand::Unclear
    }
}
