use std::sync::Arc;
use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::chat::intent::{classify, Intent};
use crate::chat::responder::{
    Responder, DELEGATION_SENTINEL, GREETING_REPLY, HELP_REPLY, TERMINAL_FALLBACK_REPLY,
};
use crate::config::{FallbackMode, ResolverSettings};
use crate::menu::Catalog;

/// A classified message and the reply rendered for it.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub intent: Intent,
    pub reply: String,
}

/// Maps free text to a reply using ordered keyword rules over a fixed catalog.
///
/// The resolver owns no conversation state. It can be shared across tasks
/// behind an `Arc`; every call only reads the catalog.
#[derive(Debug, Clone)]
pub struct IntentResolver {
    catalog: Arc<Catalog>,
    settings: ResolverSettings,
}

impl IntentResolver {
    pub fn new(catalog: Arc<Catalog>, settings: ResolverSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub fn classify(&self, text: &str) -> Intent {
        classify(&text.to_lowercase(), &self.catalog)
    }

    /// Always returns a non-empty reply.
    pub fn resolve(&self, text: &str) -> String {
        self.resolve_detailed(text).reply
    }

    pub fn resolve_detailed(&self, text: &str) -> Resolution {
        self.resolve_with_rng(text, &mut rand::thread_rng())
    }

    /// Same as [`resolve_detailed`](Self::resolve_detailed) with a caller-supplied
    /// RNG for the category shuffle.
    pub fn resolve_with_rng<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Resolution {
        let intent = self.classify(text);
        debug!("Classified {:?} as {}", text, intent.name());
        let reply = self.respond(&intent, rng);
        Resolution { intent, reply }
    }

    pub fn respond<R: Rng + ?Sized>(&self, intent: &Intent, rng: &mut R) -> String {
        let responder = Responder::new(&self.catalog, &self.settings);

        match *intent {
            Intent::Greeting => GREETING_REPLY.to_string(),
            Intent::Help => HELP_REPLY.to_string(),
            Intent::UnderCalories(limit) => responder.under_calories(limit),
            Intent::Category(category) => responder.category(category, rng),
            Intent::PriceTier(tier) => responder.price_tier(tier),
            Intent::PriceOverview => responder.price_overview(),
            Intent::Dish(id) => responder.dish(id).unwrap_or_else(|| self.fallback_reply().to_string()),
            Intent::Fallback => self.fallback_reply().to_string(),
        }
    }

    pub fn fallback_reply(&self) -> &'static str {
        match self.settings.fallback_mode {
            FallbackMode::Terminal => TERMINAL_FALLBACK_REPLY,
            FallbackMode::Delegate => DELEGATION_SENTINEL,
        }
    }

    /// True when the caller should hand the original message to a completion
    /// provider instead of showing `reply`.
    pub fn needs_delegation(&self, reply: &str) -> bool {
        self.settings.fallback_mode == FallbackMode::Delegate && reply == DELEGATION_SENTINEL
    }
}
