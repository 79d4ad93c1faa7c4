use serde::{Deserialize, Serialize};

/// A single headline scraped from the news feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: String,
    /// Raw published-time text exactly as shown on the page
    #[serde(default, rename = "time")]
    pub published_time_text: String,
    #[serde(default)]
    pub url: String,
}

impl NewsItem {
    pub fn new(headline: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_time(mut self, time_text: impl Into<String>) -> Self {
        self.published_time_text = time_text.into();
        self
    }

    /// Lowercased headline and description joined by a space, the text all
    /// keyword matching runs over.
    pub fn match_text(&self) -> String {
        format!(
            "{} {}",
            self.headline.to_lowercase(),
            self.description.to_lowercase()
        )
    }
}

/// A news item paired with its derived priority
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredItem {
    pub item: NewsItem,
    pub priority: u32,
}
