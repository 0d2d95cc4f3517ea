use log::{error, warn};
use crate::providers::traits::CompletionProvider;

/// Shown when the provider call fails outright.
pub const DELEGATION_FAILED_REPLY: &str = "Oops! Something went wrong.";

/// Shown when the provider answers with nothing.
pub const EMPTY_COMPLETION_REPLY: &str = "Sorry, I didn\u{2019}t understand that.";

/// Hands `message` to the provider once. No retry, no timeout; any failure
/// becomes a fixed apology.
pub async fn delegate(provider: &(dyn CompletionProvider + Send + Sync), message: &str) -> String {
    match provider.complete(message).await {
        Ok(reply) if !reply.trim().is_empty() => reply,
        Ok(_) => {
            warn!("Completion provider returned an empty reply");
            EMPTY_COMPLETION_REPLY.to_string()
        }
        Err(e) => {
            error!("Completion provider failed: {}", e);
            DELEGATION_FAILED_REPLY.to_string()
        }
    }
}
