pub mod api;
pub mod chat;
pub mod commands;
pub mod config;
pub mod error;
pub mod menu;
pub mod persona;
pub mod providers;

// Re-export commonly used items
pub use chat::{ChatSession, IntentResolver};
pub use config::AssistantConfig;
pub use error::AssistantError;
pub use menu::Catalog;
pub use persona::AssistantPersona;
