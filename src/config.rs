use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use log::warn;
use url::Url;

use crate::error::AssistantError;

const ENV_PREFIX: &str = "DINELINK";

/// What the resolver answers when no rule matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    /// A final "here is what I can do" message.
    #[default]
    Terminal,
    /// The sentinel the session hands to the completion provider.
    Delegate,
}

impl FromStr for FallbackMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "terminal" => Ok(FallbackMode::Terminal),
            "delegate" => Ok(FallbackMode::Delegate),
            other => Err(format!("unknown fallback mode '{}' (expected terminal or delegate)", other)),
        }
    }
}

/// Markup used by list-style replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Html,
    Plain,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "html" => Ok(RenderMode::Html),
            "plain" | "text" => Ok(RenderMode::Plain),
            other => Err(format!("unknown render mode '{}' (expected html or plain)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBound {
    pub limit: f64,
    pub inclusive: bool,
}

/// Thresholds for the "cheap" and "premium" price filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceTiers {
    /// Low tier: price below (or at, when inclusive) this bound.
    pub low: PriceBound,
    /// High tier: price above (or at, when inclusive) this bound.
    pub high: PriceBound,
}

impl PriceTiers {
    /// One split point: low is `<= split`, high is `> split`.
    pub fn split_at(split: f64) -> Self {
        Self {
            low: PriceBound { limit: split, inclusive: true },
            high: PriceBound { limit: split, inclusive: false },
        }
    }

    pub fn is_low(&self, price: f64) -> bool {
        if self.low.inclusive {
            price <= self.low.limit
        } else {
            price < self.low.limit
        }
    }

    pub fn is_high(&self, price: f64) -> bool {
        if self.high.inclusive {
            price >= self.high.limit
        } else {
            price > self.high.limit
        }
    }
}

impl Default for PriceTiers {
    fn default() -> Self {
        Self {
            low: PriceBound { limit: 18.0, inclusive: false },
            high: PriceBound { limit: 22.0, inclusive: true },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolverSettings {
    pub fallback_mode: FallbackMode,
    pub render_mode: RenderMode,
    pub price_tiers: PriceTiers,
}

#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub resolver: ResolverSettings,
    pub typing_delay: Duration,
    pub data_dir: PathBuf,
    pub history_key: String,
    pub history_limit: usize,
    pub catalog_path: Option<PathBuf>,
    pub ask_url: Option<Url>,
    pub openai_api_key: Option<String>,
    pub openai_chat_model: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverSettings::default(),
            typing_delay: Duration::from_millis(1200),
            data_dir: PathBuf::from("data"),
            history_key: "wardChatHistory".to_string(),
            history_limit: 50,
            catalog_path: None,
            ask_url: None,
            openai_api_key: None,
            openai_chat_model: "gpt-3.5-turbo".to_string(),
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Result<Self, AssistantError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Unparseable values fall back to
    /// their defaults with a warning; only a malformed relay URL is fatal.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AssistantError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |name: &str| lookup(format!("{}_{}", ENV_PREFIX, name).as_str()).filter(|v| !v.trim().is_empty());

        let default_tiers = PriceTiers::default();
        let price_tiers = PriceTiers {
            low: PriceBound {
                limit: parse_or(var("PRICE_LOW_MAX"), "PRICE_LOW_MAX", default_tiers.low.limit),
                inclusive: parse_or(var("PRICE_LOW_INCLUSIVE"), "PRICE_LOW_INCLUSIVE", default_tiers.low.inclusive),
            },
            high: PriceBound {
                limit: parse_or(var("PRICE_HIGH_MIN"), "PRICE_HIGH_MIN", default_tiers.high.limit),
                inclusive: parse_or(var("PRICE_HIGH_INCLUSIVE"), "PRICE_HIGH_INCLUSIVE", default_tiers.high.inclusive),
            },
        };

        let resolver = ResolverSettings {
            fallback_mode: parse_or(var("FALLBACK_MODE"), "FALLBACK_MODE", defaults.resolver.fallback_mode),
            render_mode: parse_or(var("RENDER_MODE"), "RENDER_MODE", defaults.resolver.render_mode),
            price_tiers,
        };

        let delay_ms: u64 = parse_or(
            var("TYPING_DELAY_MS"),
            "TYPING_DELAY_MS",
            defaults.typing_delay.as_millis() as u64,
        );

        let ask_url = match var("ASK_URL") {
            Some(raw) => Some(
                Url::parse(raw.trim())
                    .map_err(|e| AssistantError::Config(format!("{}_ASK_URL is not a valid URL: {}", ENV_PREFIX, e)))?,
            ),
            None => None,
        };

        Ok(Self {
            resolver,
            typing_delay: Duration::from_millis(delay_ms),
            data_dir: var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            history_key: var("HISTORY_KEY").unwrap_or(defaults.history_key),
            history_limit: parse_or(var("HISTORY_LIMIT"), "HISTORY_LIMIT", defaults.history_limit),
            catalog_path: var("CATALOG").map(PathBuf::from),
            ask_url,
            openai_api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            openai_chat_model: lookup("OPENAI_CHAT_MODEL").unwrap_or(defaults.openai_chat_model),
        })
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.history_key))
    }
}

fn parse_or<T>(raw: Option<String>, name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {}_{} value '{}': {}, using default", ENV_PREFIX, name, value, e);
            default
        }),
        None => default,
    }
}
