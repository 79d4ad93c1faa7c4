use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

use crate::config::TelegramConfig;

/// Telegram caps messages at 4096 UTF-16 code units; stay under it
pub const MESSAGE_CHAR_LIMIT: usize = 4000;

const PARAGRAPH_BREAK: &str = "\n\n";

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

pub struct TelegramPublisher {
    client: Client,
    chat_id: String,
    base_url: String,
    chunk_limit: usize,
}

impl TelegramPublisher {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            chat_id: config.chat_id,
            base_url: format!("https://api.telegram.org/bot{}", config.bot_token),
            chunk_limit: MESSAGE_CHAR_LIMIT,
        })
    }

    pub async fn send_message(&self, text: &str) -> Result<()> {
        let url = format!("{}/sendMessage", self.base_url);
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            disable_web_page_preview: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach Telegram")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("unknown error"));
            error!(%status, "Telegram rejected message");
            anyhow::bail!("Telegram API error: {} - {}", status, error_text);
        }

        Ok(())
    }

    /// Send `text` as one or more plain-text messages. Returns the number of
    /// messages delivered.
    pub async fn publish(&self, text: &str) -> Result<usize> {
        let chunks = chunk_message(text, self.chunk_limit);
        let total = chunks.len();

        for (i, chunk) in chunks.iter().enumerate() {
            self.send_message(chunk)
                .await
                .with_context(|| format!("Failed to send message {}/{}", i + 1, total))?;
            info!("Sent message {}/{} ({} chars)", i + 1, total, chunk.chars().count());
        }

        Ok(total)
    }
}

/// Length as Telegram counts it: UTF-16 code units
fn telegram_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Split `text` into chunks of at most `limit` UTF-16 code units, breaking
/// only between paragraphs. A single paragraph longer than `limit` is cut on
/// character boundaries.
pub fn chunk_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(2);
    let sep_units = telegram_len(PARAGRAPH_BREAK);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for paragraph in text.split(PARAGRAPH_BREAK) {
        let paragraph = paragraph.trim_matches('\n');
        if paragraph.trim().is_empty() {
            continue;
        }
        let para_len = telegram_len(paragraph);
        let sep_len = if current.is_empty() { 0 } else { sep_units };

        if current_len + sep_len + para_len <= limit {
            if !current.is_empty() {
                current.push_str(PARAGRAPH_BREAK);
            }
            current.push_str(paragraph);
            current_len += sep_len + para_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if para_len <= limit {
            current.push_str(paragraph);
            current_len = para_len;
        } else {
            let mut piece = String::new();
            let mut piece_len = 0;
            for c in paragraph.chars() {
                let units = c.len_utf16();
                if piece_len + units > limit {
                    chunks.push(std::mem::take(&mut piece));
                    piece_len = 0;
                }
                piece.push(c);
                piece_len += units;
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
