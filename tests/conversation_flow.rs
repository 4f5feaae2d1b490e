// State transition table of the conversation engine
use docverify::config::ConversationSettings;
use docverify::conversation::{messages, ConversationContext, ConversationState, MenuOption, FAQ};
use docverify::storage::RecordStore;
use docverify::{
    ConversationEngine, DocumentCategory, DocumentVerifier, StudentRecord, TurnRequest, TurnResponse,
    VerificationResult,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Reports a fixed set of categories as present and counts calls.
struct FixedVerifier {
    present: Vec<DocumentCategory>,
    calls: Arc<AtomicUsize>,
}

impl DocumentVerifier for FixedVerifier {
    fn verify(&self, _identity_number: &str, _full_name: &str) -> VerificationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut result = VerificationResult::default();
        for category in DocumentCategory::ALL {
            result.found.insert(category, self.present.contains(&category));
        }
        result.trace.push("🔍 Buscando en cedulas...".to_string());
        result
    }
}

fn student() -> StudentRecord {
    StudentRecord {
        document_type: "CC".into(),
        identity_number: "12345678".into(),
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

fn engine_with(present: Vec<DocumentCategory>, records: Vec<StudentRecord>) -> (ConversationEngine, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = ConversationEngine::new(
        Box::new(RecordStore::from_records(records)),
        Box::new(FixedVerifier {
            present,
            calls: calls.clone(),
        }),
        ConversationSettings::default(),
    );
    (engine, calls)
}

fn turn(engine: &ConversationEngine, state: ConversationState, message: &str) -> TurnResponse {
    engine.handle_turn(TurnRequest {
        state,
        message: message.to_string(),
        context: ConversationContext::default(),
    })
}

#[rstest]
#[case("hola", true)]
#[case("Buenas tardes", true)]
#[case("quiero saber algo", false)]
#[case("", false)]
fn test_start_always_lands_in_main_menu(#[case] input: &str, #[case] greeting: bool) {
    let (engine, calls) = engine_with(vec![], vec![student()]);
    let response = turn(&engine, ConversationState::Start, input);

    assert_eq!(response.state, ConversationState::MainMenu);
    assert!(response.message.contains(messages::MAIN_MENU));
    assert_eq!(response.context.last_greeting.is_some(), greeting);
    if greeting {
        assert!(messages::GREETINGS.iter().any(|g| response.message.starts_with(g)));
    } else {
        assert!(response.message.starts_with(messages::WELCOME));
    }
    assert_eq!(response.found, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case("1", ConversationState::AwaitingIdentity, Some(MenuOption::CheckDocuments))]
#[case("estado de documentos", ConversationState::AwaitingIdentity, Some(MenuOption::CheckDocuments))]
#[case("2", ConversationState::FaqMenu, Some(MenuOption::Faq))]
#[case("3", ConversationState::MainMenu, Some(MenuOption::StageInfo))]
#[case("banana", ConversationState::MainMenu, None)]
fn test_main_menu_dispatch(
    #[case] input: &str,
    #[case] next: ConversationState,
    #[case] option: Option<MenuOption>,
) {
    let (engine, _) = engine_with(vec![], vec![]);
    let response = turn(&engine, ConversationState::MainMenu, input);

    assert_eq!(response.state, next);
    assert_eq!(response.context.menu_option, option);
}

#[test]
fn test_faq_menu_lists_every_question() {
    let (engine, _) = engine_with(vec![], vec![]);
    let response = turn(&engine, ConversationState::MainMenu, "preguntas frecuentes");

    for (index, entry) in FAQ.iter().enumerate() {
        assert!(response.message.contains(&format!("{}. {}", index + 1, entry.question)));
    }
}

#[test]
fn test_faq_selection_returns_answer_then_asks_to_continue() {
    let (engine, _) = engine_with(vec![], vec![]);
    let response = turn(&engine, ConversationState::FaqMenu, "2");

    assert_eq!(response.state, ConversationState::Final);
    assert!(response.message.starts_with(FAQ[1].answer));
    assert!(response.message.ends_with(messages::CONTINUE_PROMPT));
    assert_eq!(response.context.faq_key.as_deref(), Some(FAQ[1].key));
}

#[test]
fn test_faq_out_of_range_relists() {
    let (engine, _) = engine_with(vec![], vec![]);
    let response = turn(&engine, ConversationState::FaqMenu, "99");

    assert_eq!(response.state, ConversationState::FaqMenu);
    assert!(response.message.contains(FAQ[0].question));
    assert_eq!(response.context.faq_key, None);
}

#[test]
fn test_short_identity_is_rejected() {
    let (engine, calls) = engine_with(vec![], vec![student()]);
    let response = turn(&engine, ConversationState::AwaitingIdentity, "123");

    assert_eq!(response.state, ConversationState::AwaitingIdentity);
    assert!(response.message.contains("entre 8 y 10 dígitos"));
    assert_eq!(response.found, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_identity_ends_not_found() {
    let (engine, calls) = engine_with(vec![], vec![]);
    let response = turn(&engine, ConversationState::AwaitingIdentity, "12345678");

    assert_eq!(response.state, ConversationState::Final);
    assert_eq!(response.found, Some(false));
    assert!(response.message.starts_with(messages::NOT_FOUND));
    assert!(response.message.ends_with(messages::CONTINUE_PROMPT));
    assert_eq!(response.trace, None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_known_identity_with_everything_on_file() {
    let (engine, calls) = engine_with(DocumentCategory::ALL.to_vec(), vec![student()]);
    let response = turn(&engine, ConversationState::AwaitingIdentity, "12345678");

    assert_eq!(response.state, ConversationState::Final);
    assert_eq!(response.found, Some(true));
    assert!(response.message.contains("<b>Nicolle Alejandra Gonzalez Rodriguez</b>"));
    assert!(response.message.contains("Tienes TODOS tus documentos al día"));
    assert!(response.message.ends_with(messages::CONTINUE_PROMPT));
    assert!(!response.message.contains("Documentos faltantes"));
    assert_eq!(response.trace, Some(vec!["🔍 Buscando en cedulas...".to_string()]));
    assert_eq!(response.context.identity_number.as_deref(), Some("12345678"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_known_identity_lists_missing_documents() {
    let (engine, _) = engine_with(vec![DocumentCategory::Identity], vec![student()]);
    let response = turn(&engine, ConversationState::AwaitingIdentity, "12345678");

    assert_eq!(response.found, Some(true));
    assert!(response.message.contains("Documentos faltantes"));
    assert!(!response.message.contains("Documento (CC)"));
    assert!(response.message.contains("F-023: No encontrada"));
    assert!(response.message.contains("Evaluación: No encontrada"));
}

#[rstest]
#[case("sí", ConversationState::MainMenu)]
#[case("1", ConversationState::MainMenu)]
#[case("no", ConversationState::Start)]
#[case("n", ConversationState::Start)]
#[case("quizas", ConversationState::Final)]
fn test_final_continuation(#[case] input: &str, #[case] next: ConversationState) {
    let (engine, _) = engine_with(vec![], vec![]);
    assert_eq!(turn(&engine, ConversationState::Final, input).state, next);
}

#[test]
fn test_context_passes_through_unknown_keys() {
    let (engine, _) = engine_with(vec![], vec![]);
    let request: TurnRequest = serde_json::from_value(json!({
        "state": "final",
        "message": "no",
        "context": {"client_id": "web-7", "identity_number": "12345678"}
    }))
    .unwrap();

    let response = engine.handle_turn(request);
    let wire = serde_json::to_value(&response).unwrap();

    assert_eq!(wire["state"], json!("start"));
    assert_eq!(wire["context"], json!({"client_id": "web-7"}));
    assert!(wire.get("found").is_none());
}

#[test]
fn test_first_turn_tolerates_missing_fields() {
    let (engine, _) = engine_with(vec![], vec![]);
    let request: TurnRequest = serde_json::from_value(json!({"message": "hola"})).unwrap();

    let response = engine.handle_turn(request);
    assert_eq!(response.state, ConversationState::MainMenu);
}

#[test]
fn test_full_dialogue() {
    let (engine, calls) = engine_with(DocumentCategory::ALL.to_vec(), vec![student()]);
    let mut request = TurnRequest::default();

    for (input, expected) in [
        ("hola", ConversationState::MainMenu),
        ("1", ConversationState::AwaitingIdentity),
        ("12ab", ConversationState::AwaitingIdentity),
        ("12345678", ConversationState::Final),
        ("si", ConversationState::MainMenu),
        ("2", ConversationState::FaqMenu),
        ("1", ConversationState::Final),
        ("no", ConversationState::Start),
    ] {
        request.message = input.to_string();
        let response = engine.handle_turn(request.clone());
        assert_eq!(response.state, expected, "after input {:?}", input);
        request.state = response.state;
        request.context = response.context;
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
