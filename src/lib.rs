// docverify - student document verification over scanned and native PDFs
pub mod app;
pub mod config;
pub mod conversation;
pub mod error;
pub mod matching;
pub mod pdf_extraction;
pub mod storage;
pub mod text_normalizer;
pub mod types;
pub mod verification;

pub use config::Settings;
pub use conversation::{ConversationEngine, ConversationState, TurnRequest, TurnResponse};
pub use matching::{CompiledQuery, MatchEngine, MatchOutcome};
pub use types::{DocumentCategory, StudentRecord, VerificationResult};
pub use verification::{DocumentVerifier, VerificationOrchestrator};
