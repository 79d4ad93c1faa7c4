use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::io::load_news;
use crate::models::NewsItem;

pub const PULSE_URL: &str = "https://pulse.zerodha.com/";

/// Format of absolute times on the page, e.g. "12:27 AM, 27 May 2025"
pub const PULSE_TIME_FORMAT: &str = "%I:%M %p, %d %b %Y";

const IST_OFFSET_SECS: i64 = 5 * 3600 + 30 * 60;

/// Anything that yields an ordered list of news items
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<NewsItem>>;
}

/// Scrapes the Zerodha Pulse front page
pub struct PulseScraper {
    client: Client,
    url: String,
    window: Option<PublishedWindow>,
}

impl PulseScraper {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; PulseDigest/1.0)")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: PULSE_URL.to_string(),
            window: None,
        })
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_window(mut self, window: PublishedWindow) -> Self {
        self.window = Some(window);
        self
    }
}

#[async_trait]
impl NewsSource for PulseScraper {
    async fn fetch(&self) -> Result<Vec<NewsItem>> {
        info!(url = %self.url, "Loading news page");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("Failed to send HTTP request")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("News page returned HTTP {}", status);
        }

        let html = response.text().await.context("Failed to read response body")?;
        let base = Url::parse(&self.url).context("Invalid news page URL")?;

        let mut items = parse_pulse_html(&html, &base)?;
        info!("Found {} news items", items.len());

        if let Some(window) = &self.window {
            let before = items.len();
            items.retain(|item| window.contains(&item.published_time_text));
            info!(
                kept = items.len(),
                dropped = before - items.len(),
                "Applied published-time window"
            );
        }

        Ok(items)
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector {}: {:?}", css, e))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extract news items from a Pulse page. Items without a headline link are
/// skipped; other missing fields fall back to placeholders.
pub fn parse_pulse_html(html: &str, base: &Url) -> Result<Vec<NewsItem>> {
    let document = Html::parse_document(html);

    let item_sel = selector("#news li.box.item")?;
    let headline_sel = selector("h2.title a")?;
    let desc_sel = selector(".desc")?;
    let date_sel = selector(".date")?;
    let feed_sel = selector(".feed")?;

    let mut items = Vec::new();

    for (i, node) in document.select(&item_sel).enumerate() {
        let Some(link) = node.select(&headline_sel).next() else {
            warn!("Skipping article {}: no headline link", i + 1);
            continue;
        };

        let headline = element_text(link);
        let url = link
            .value()
            .attr("href")
            .and_then(|href| base.join(href).ok())
            .map(|u| u.to_string())
            .unwrap_or_default();

        let description = node
            .select(&desc_sel)
            .next()
            .map(element_text)
            .unwrap_or_default();

        let published_time_text = node
            .select(&date_sel)
            .next()
            .map(|date| {
                date.value()
                    .attr("title")
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| element_text(date))
            })
            .unwrap_or_else(|| "Unknown time".to_string());

        let source = node
            .select(&feed_sel)
            .next()
            .map(|feed| element_text(feed).replace('—', "").trim().to_string())
            .unwrap_or_else(|| "Unknown source".to_string());

        debug!("Article {}: {}", items.len() + 1, crate::prompts::truncate_chars(&headline, 50));

        items.push(NewsItem {
            headline,
            description,
            source,
            published_time_text,
            url,
        });
    }

    Ok(items)
}

/// Reads a previously saved news file
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl NewsSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<NewsItem>> {
        let items = load_news(&self.path)?;
        info!("Loaded {} news items from {}", items.len(), self.path.display());
        Ok(items)
    }
}

/// Published-time range in India Standard Time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishedWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PublishedWindow {
    /// From `start` (a "12:00 AM, 27 May 2025" string) until now in IST
    pub fn since(start: &str) -> Result<Self> {
        let start = NaiveDateTime::parse_from_str(start.trim(), PULSE_TIME_FORMAT).with_context(
            || format!("Could not parse start time '{}'; expected e.g. \"12:00 AM, 27 May 2025\"", start),
        )?;
        Ok(Self {
            start,
            end: ist_now(),
        })
    }

    /// Relative times ("5 minutes ago", "Today at 10:15") count as inside;
    /// anything unparseable counts as outside.
    pub fn contains(&self, time_text: &str) -> bool {
        let lower = time_text.to_lowercase();
        if lower.contains("ago") {
            return true;
        }
        if lower.contains("today") {
            return self.end >= self.start;
        }
        match NaiveDateTime::parse_from_str(time_text.trim(), PULSE_TIME_FORMAT) {
            Ok(published) => self.start <= published && published <= self.end,
            Err(_) => {
                debug!("Could not parse date format: {}", time_text);
                false
            }
        }
    }
}

/// Current wall-clock time in IST (UTC+5:30)
pub fn ist_now() -> NaiveDateTime {
    Utc::now().naive_utc() + chrono::Duration::seconds(IST_OFFSET_SECS)
}
