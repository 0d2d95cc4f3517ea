use std::sync::Arc;
use std::time::Duration;
use log::{debug, error, warn};

use crate::chat::history::{ConversationLog, ConversationTurn, HistoryStore, Sender};
use crate::chat::resolver::IntentResolver;
use crate::error::AssistantError;
use crate::providers::traits::CompletionProvider;
use crate::providers::utils::delegate;

/// One user's conversation: owns the log, paces replies, and delegates
/// unmatched messages when the resolver asks for it.
pub struct ChatSession {
    resolver: Arc<IntentResolver>,
    provider: Option<Box<dyn CompletionProvider + Send + Sync>>,
    log: ConversationLog,
    store: Option<HistoryStore>,
    typing_delay: Duration,
}

impl ChatSession {
    pub fn new(resolver: Arc<IntentResolver>, history_limit: usize) -> Self {
        Self {
            resolver,
            provider: None,
            log: ConversationLog::new(history_limit),
            store: None,
            typing_delay: Duration::ZERO,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn CompletionProvider + Send + Sync>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Restores the log from `store` and saves back to it after every reply.
    pub fn with_store(mut self, store: HistoryStore) -> Self {
        self.log = store.load();
        self.store = Some(store);
        self
    }

    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    pub fn clear(&mut self) -> Result<(), AssistantError> {
        self.log.clear();
        self.persist()
    }

    /// Handles one submission. Blank input is ignored and yields `None`.
    /// A failed history save is logged; the reply is still returned.
    pub async fn submit(&mut self, message: &str) -> Option<String> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        self.log.push(ConversationTurn::new(Sender::User, message));

        if !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }

        let mut reply = self.resolver.resolve(message);
        if self.resolver.needs_delegation(&reply) {
            match &self.provider {
                Some(provider) => {
                    debug!("No rule matched, delegating to completion provider");
                    reply = delegate(provider.as_ref(), message).await;
                }
                None => warn!("No rule matched and no completion provider is configured"),
            }
        }

        self.log.push(ConversationTurn::new(Sender::Bot, reply.clone()));
        if let Err(e) = self.persist() {
            error!("Failed to save conversation history: {}", e);
        }

        Some(reply)
    }

    fn persist(&self) -> Result<(), AssistantError> {
        if let Some(store) = &self.store {
            store.save(&self.log)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::responder::{DELEGATION_SENTINEL, GREETING_REPLY, TERMINAL_FALLBACK_REPLY};
    use crate::config::{FallbackMode, ResolverSettings};
    use crate::menu::Catalog;
    use crate::providers::utils::tests::CannedProvider;
    use crate::providers::utils::DELEGATION_FAILED_REPLY;
    use tempfile::TempDir;

    fn resolver(mode: FallbackMode) -> Arc<IntentResolver> {
        Arc::new(IntentResolver::new(
            Arc::new(Catalog::default()),
            ResolverSettings { fallback_mode: mode, ..ResolverSettings::default() },
        ))
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let mut session = ChatSession::new(resolver(FallbackMode::Terminal), 50);
        assert_eq!(session.submit("   ").await, None);
        assert!(session.log().is_empty());
    }

    #[tokio::test]
    async fn test_records_both_turns() {
        let mut session = ChatSession::new(resolver(FallbackMode::Terminal), 50);
        let reply = session.submit("  hello  ").await.unwrap();

        assert_eq!(reply, GREETING_REPLY);
        let turns = session.log().turns();
        assert_eq!(turns.len(), 2);
        assert_eq!((turns[0].sender, turns[0].text.as_str()), (Sender::User, "hello"));
        assert_eq!((turns[1].sender, turns[1].text.as_str()), (Sender::Bot, GREETING_REPLY));
    }

    #[tokio::test]
    async fn test_delegates_unmatched_messages() {
        let provider = CannedProvider { reply: Some("AI says: {prompt}".to_string()) };
        let mut session = ChatSession::new(resolver(FallbackMode::Delegate), 50)
            .with_provider(Box::new(provider));

        let reply = session.submit("asdkjasd").await.unwrap();
        assert_eq!(reply, "AI says: asdkjasd");
        assert_eq!(session.log().turns()[1].text, "AI says: asdkjasd");
    }

    #[tokio::test]
    async fn test_failed_delegation_apologises() {
        let mut session = ChatSession::new(resolver(FallbackMode::Delegate), 50)
            .with_provider(Box::new(CannedProvider { reply: None }));
        assert_eq!(session.submit("asdkjasd").await.unwrap(), DELEGATION_FAILED_REPLY);
    }

    #[tokio::test]
    async fn test_sentinel_kept_without_provider() {
        let mut session = ChatSession::new(resolver(FallbackMode::Delegate), 50);
        assert_eq!(session.submit("asdkjasd").await.unwrap(), DELEGATION_SENTINEL);
    }

    #[tokio::test]
    async fn test_terminal_mode_never_delegates() {
        let provider = CannedProvider { reply: Some("should not be used".to_string()) };
        let mut session = ChatSession::new(resolver(FallbackMode::Terminal), 50)
            .with_provider(Box::new(provider));
        assert_eq!(session.submit("asdkjasd").await.unwrap(), TERMINAL_FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_typing_delay_is_applied() {
        let mut session = ChatSession::new(resolver(FallbackMode::Terminal), 50)
            .with_typing_delay(Duration::from_millis(40));

        let started = std::time::Instant::now();
        session.submit("hey").await;
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_history_persists_across_sessions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wardChatHistory.json");

        let mut first = ChatSession::new(resolver(FallbackMode::Terminal), 50)
            .with_store(HistoryStore::new(&path, 50));
        first.submit("hello").await;
        first.submit("under 400 calories").await;

        let second = ChatSession::new(resolver(FallbackMode::Terminal), 50)
            .with_store(HistoryStore::new(&path, 50));
        assert_eq!(second.log().len(), 4);
        assert_eq!(second.log().turns()[2].text, "under 400 calories");
    }

    #[tokio::test]
    async fn test_reply_survives_failed_save() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let mut session = ChatSession::new(resolver(FallbackMode::Terminal), 50)
            .with_store(HistoryStore::new(blocker.join("history.json"), 50));

        assert_eq!(session.submit("hello").await.as_deref(), Some(GREETING_REPLY));
        assert_eq!(session.log().len(), 2);
    }

    #[tokio::test]
    async fn test_clear_empties_saved_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let mut session = ChatSession::new(resolver(FallbackMode::Terminal), 50)
            .with_store(HistoryStore::new(&path, 50));
        session.submit("hello").await;
        session.clear().unwrap();

        assert!(HistoryStore::new(&path, 50).load().is_empty());
    }
}
