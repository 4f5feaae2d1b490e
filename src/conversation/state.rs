// Conversation states and the context carried by the client between turns
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    Start,
    MainMenu,
    FaqMenu,
    AwaitingIdentity,
    Final,
}

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOption {
    CheckDocuments,
    Faq,
    StageInfo,
}

/// Round-trips through the client on every turn; the server keeps nothing.
///
/// Keys the engine does not own land in `extra` and come back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Greeting sent on the last Start turn, so the next one can differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_greeting: Option<String>,
    /// Last main menu entry chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_option: Option<MenuOption>,
    /// Key of the last FAQ answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faq_key: Option<String>,
    /// Identity number of the last lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationContext {
    /// Drop everything the engine owns, keep the client's keys.
    pub fn reset(&mut self) {
        self.last_greeting = None;
        self.menu_option = None;
        self.faq_key = None;
        self.identity_number = None;
    }
}
