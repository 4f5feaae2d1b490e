// Multi-turn dialogue over stateless requests
pub mod engine;
pub mod intent;
pub mod messages;
pub mod state;

pub use engine::{ConversationEngine, TurnRequest, TurnResponse};
pub use messages::{FaqEntry, FAQ};
pub use state::{ConversationContext, ConversationState, MenuOption};
