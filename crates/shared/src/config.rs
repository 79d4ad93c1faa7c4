use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;
use tracing::warn;

use crate::classifier::SectorRule;
use crate::summarizer::RetryPolicy;
use crate::vocabulary::{HIGH_IMPACT_TERMS, MARKET_MOVER_TERMS, SECTOR_KEYWORDS};

const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(15) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        try_load_dotenv();

        let groq_api_key = env::var("GROQ_API_KEY").context(
            "GROQ_API_KEY not found.\n\n\
            To fix this, create ~/.config/pulse-digest/.env with:\n  \
            GROQ_API_KEY=gsk_your_key_here\n\n\
            Get a Groq API key from: https://console.groq.com/keys",
        )?;

        if !groq_api_key.starts_with("gsk_") {
            warn!("GROQ_API_KEY does not start with 'gsk_'; requests will probably be rejected");
        }

        Ok(Self { groq_api_key })
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl TelegramConfig {
    pub fn from_env() -> Result<Self> {
        try_load_dotenv();

        let bot_token = env::var("TELEGRAM_BOT_TOKEN").context(
            "TELEGRAM_BOT_TOKEN not found. Set it as an environment variable or in ~/.config/pulse-digest/.env",
        )?;
        let chat_id = env::var("TELEGRAM_CHAT_ID").context(
            "TELEGRAM_CHAT_ID not found. Set it as an environment variable or in ~/.config/pulse-digest/.env",
        )?;

        Ok(Self { bot_token, chat_id })
    }
}

fn try_load_dotenv() {
    // 1. Current directory (for development)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // 2. ~/.config/pulse-digest/.env
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("pulse-digest").join(".env");
        if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
            return;
        }
    }

    // 3. ~/.env
    if let Some(home_dir) = dirs::home_dir() {
        let home_path = home_dir.join(".env");
        if home_path.exists() {
            let _ = dotenvy::from_path(&home_path);
        }
    }
}

/// Static tuning for one analysis run. Built once at startup and shared
/// read-only by the prioritizer, classifier and analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub sectors: Vec<SectorRule>,
    pub high_impact: Vec<String>,
    pub market_movers: Vec<String>,
    pub batch_size: NonZeroUsize,
    pub retry: RetryPolicy,
    /// Lowercase month-year token (e.g. "may 2025") that earns the recency bonus
    pub recency_token: Option<String>,
    pub inter_batch_delay: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sectors: SECTOR_KEYWORDS
                .iter()
                .map(|(name, keywords)| SectorRule::new(*name, keywords.iter().copied()))
                .collect(),
            high_impact: HIGH_IMPACT_TERMS.iter().map(|t| t.to_string()).collect(),
            market_movers: MARKET_MOVER_TERMS.iter().map(|t| t.to_string()).collect(),
            batch_size: DEFAULT_BATCH_SIZE,
            retry: RetryPolicy::default(),
            recency_token: None,
            inter_batch_delay: Duration::from_secs(1),
        }
    }
}

impl AnalyzerConfig {
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_recency_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into().trim().to_lowercase();
        self.recency_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    /// Recency token for the month containing `now`, matching the
    /// "12:27 AM, 27 May 2025" time text the feed shows.
    pub fn with_recency_month<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let token = now.format("%b %Y").to_string();
        self.with_recency_token(token)
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.retry.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_inter_batch_delay(mut self, delay: Duration) -> Self {
        self.inter_batch_delay = delay;
        self
    }
}
