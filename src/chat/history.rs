use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use log::{error, info};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to access history file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub sender: Sender,
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ConversationTurn {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Conversation log capped to the most recent `limit` turns.
#[derive(Debug, Clone)]
pub struct ConversationLog {
    turns: Vec<ConversationTurn>,
    limit: usize,
}

impl ConversationLog {
    pub fn new(limit: usize) -> Self {
        Self { turns: Vec::new(), limit }
    }

    pub fn from_turns(turns: Vec<ConversationTurn>, limit: usize) -> Self {
        let mut log = Self { turns, limit };
        log.trim();
        log
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        self.trim();
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    fn trim(&mut self) {
        if self.turns.len() > self.limit {
            let excess = self.turns.len() - self.limit;
            self.turns.drain(..excess);
        }
    }
}

/// JSON file holding one conversation log.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
}

impl HistoryStore {
    pub fn new<P: AsRef<Path>>(path: P, limit: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            limit,
        }
    }

    /// Missing files give an empty log. So do unreadable or corrupt ones,
    /// after logging the problem.
    pub fn load(&self) -> ConversationLog {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return ConversationLog::new(self.limit),
            Err(e) => {
                error!("Failed to read chat history from {}: {}", self.path.display(), e);
                return ConversationLog::new(self.limit);
            }
        };

        match serde_json::from_str::<Vec<ConversationTurn>>(&content) {
            Ok(turns) => {
                let log = ConversationLog::from_turns(turns, self.limit);
                info!("Restored {} chat turns from {}", log.len(), self.path.display());
                log
            }
            Err(e) => {
                error!("Failed to parse chat history: {}", e);
                ConversationLog::new(self.limit)
            }
        }
    }

    pub fn save(&self, log: &ConversationLog) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string(log.turns())?;
        fs::write(&self.path, json).map_err(|source| HistoryError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
