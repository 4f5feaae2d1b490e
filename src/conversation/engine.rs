// Stateless turn handler: (state, input, context) -> (reply, next state, context)
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{debug, info};

use super::intent::{
    classify_continue, classify_faq, classify_identity, classify_menu, classify_start, ContinueCommand, FaqCommand,
    IdentityCommand, MenuCommand, StartCommand,
};
use super::messages::{self, FAQ, GREETINGS};
use super::state::{ConversationContext, ConversationState, MenuOption};
use crate::config::ConversationSettings;
use crate::storage::RecordLookup;
use crate::verification::DocumentVerifier;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub state: ConversationState,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: ConversationContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub message: String,
    pub state: ConversationState,
    pub context: ConversationContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
}

impl TurnResponse {
    fn reply(message: impl Into<String>, state: ConversationState, context: ConversationContext) -> Self {
        Self {
            message: message.into(),
            state,
            context,
            found: None,
            trace: None,
        }
    }
}

pub struct ConversationEngine {
    records: Box<dyn RecordLookup>,
    verifier: Box<dyn DocumentVerifier>,
    identity_length: RangeInclusive<usize>,
}

impl ConversationEngine {
    pub fn new(
        records: Box<dyn RecordLookup>,
        verifier: Box<dyn DocumentVerifier>,
        settings: ConversationSettings,
    ) -> Self {
        Self {
            records,
            verifier,
            identity_length: settings.identity_min_len..=settings.identity_max_len,
        }
    }

    /// Always produces a well-formed response.
    pub fn handle_turn(&self, request: TurnRequest) -> TurnResponse {
        let TurnRequest {
            state,
            message,
            context,
        } = request;
        debug!("turn in state {:?}", state);

        match state {
            ConversationState::Start => self.on_start(&message, context),
            ConversationState::MainMenu => self.on_main_menu(&message, context),
            ConversationState::FaqMenu => self.on_faq_menu(&message, context),
            ConversationState::AwaitingIdentity => self.on_awaiting_identity(&message, context),
            ConversationState::Final => self.on_final(&message, context),
        }
    }

    fn on_start(&self, input: &str, mut context: ConversationContext) -> TurnResponse {
        let opening = match classify_start(input) {
            StartCommand::Greeting => {
                let greeting = pick_greeting(context.last_greeting.as_deref());
                context.last_greeting = Some(greeting.to_string());
                greeting
            }
            StartCommand::Other => messages::WELCOME,
        };
        TurnResponse::reply(
            format!("{}<br>{}", opening, messages::MAIN_MENU),
            ConversationState::MainMenu,
            context,
        )
    }

    fn on_main_menu(&self, input: &str, mut context: ConversationContext) -> TurnResponse {
        match classify_menu(input) {
            MenuCommand::CheckDocuments => {
                context.menu_option = Some(MenuOption::CheckDocuments);
                TurnResponse::reply(messages::IDENTITY_PROMPT, ConversationState::AwaitingIdentity, context)
            }
            MenuCommand::Faq => {
                context.menu_option = Some(MenuOption::Faq);
                TurnResponse::reply(
                    messages::faq_list("Estas son las preguntas frecuentes:"),
                    ConversationState::FaqMenu,
                    context,
                )
            }
            MenuCommand::StageInfo => {
                context.menu_option = Some(MenuOption::StageInfo);
                TurnResponse::reply(
                    format!("{}<br><br>{}", messages::STAGE_INFO, messages::MAIN_MENU),
                    ConversationState::MainMenu,
                    context,
                )
            }
            MenuCommand::Unrecognized => TurnResponse::reply(
                format!("{}<br>{}", messages::MENU_REPROMPT, messages::MAIN_MENU),
                ConversationState::MainMenu,
                context,
            ),
        }
    }

    fn on_faq_menu(&self, input: &str, mut context: ConversationContext) -> TurnResponse {
        match classify_faq(input, FAQ.len()) {
            FaqCommand::Select(number) => {
                let entry = &FAQ[number - 1];
                context.faq_key = Some(entry.key.to_string());
                TurnResponse::reply(messages::with_continue_prompt(entry.answer), ConversationState::Final, context)
            }
            FaqCommand::Invalid => TurnResponse::reply(
                messages::faq_list("Elige una de las preguntas disponibles:"),
                ConversationState::FaqMenu,
                context,
            ),
        }
    }

    fn on_awaiting_identity(&self, input: &str, mut context: ConversationContext) -> TurnResponse {
        let identity_number = match classify_identity(input, &self.identity_length) {
            IdentityCommand::Valid(number) => number,
            IdentityCommand::Invalid => {
                return TurnResponse::reply(
                    messages::invalid_identity(*self.identity_length.start(), *self.identity_length.end()),
                    ConversationState::AwaitingIdentity,
                    context,
                )
            }
        };
        context.identity_number = Some(identity_number.clone());

        let Some(record) = self.records.lookup(&identity_number) else {
            info!("identity {} not in records", identity_number);
            let mut response = TurnResponse::reply(
                messages::with_continue_prompt(messages::NOT_FOUND),
                ConversationState::Final,
                context,
            );
            response.found = Some(false);
            return response;
        };

        let result = self.verifier.verify(&identity_number, &record.full_name());
        let mut response = TurnResponse::reply(
            messages::verification_report(&record, &result),
            ConversationState::Final,
            context,
        );
        response.found = Some(true);
        response.trace = Some(result.trace);
        response
    }

    fn on_final(&self, input: &str, mut context: ConversationContext) -> TurnResponse {
        match classify_continue(input) {
            ContinueCommand::Affirmative => {
                TurnResponse::reply(messages::MAIN_MENU, ConversationState::MainMenu, context)
            }
            ContinueCommand::Negative => {
                context.reset();
                TurnResponse::reply(messages::FAREWELL, ConversationState::Start, context)
            }
            ContinueCommand::Unclear => {
                TurnResponse::reply(messages::CONTINUE_REPROMPT, ConversationState::Final, context)
            }
        }
    }
}

/// Random greeting, avoiding the previous one when there is a choice.
fn pick_greeting(last: Option<&str>) -> &'static str {
    let candidates: Vec<&'static str> = GREETINGS.iter().copied().filter(|g| Some(*g) != last).collect();
    let pool: &[&'static str] = if candidates.is_empty() { GREETINGS } else { &candidates };
    pool.choose(&mut rand::thread_rng()).copied().unwrap_or(messages::WELCOME)
}
