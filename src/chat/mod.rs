pub mod history;
pub mod intent;
pub mod resolver;
pub mod responder;
pub mod session;

pub use history::{ConversationLog, ConversationTurn, HistoryStore, Sender};
pub use intent::{Intent, PriceTier};
pub use resolver::{IntentResolver, Resolution};
pub use session::ChatSession;
