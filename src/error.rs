use thiserror::Error;

use crate::chat::history::HistoryError;
use crate::menu::CatalogError;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("History error: {0}")]
    History(#[from] HistoryError),
    #[error("Configuration error: {0}")]
    Config(String),
}
