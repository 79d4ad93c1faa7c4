use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::AnalysisStats;
use crate::models::NewsItem;

pub const NEWS_PREFIX: &str = "pulse_news_";

/// Must not start with `NEWS_PREFIX`, or news lookups would pick up stats
pub const STATS_PREFIX: &str = "pulse_stats_";

/// Default directory for scraped news and reports: `./data`
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn timestamped_name<Tz: TimeZone>(prefix: &str, date: &DateTime<Tz>, ext: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}{}.{}", prefix, date.format("%Y-%m-%d_%H-%M-%S"), ext)
}

/// Save scraped news to a pretty-printed JSON file
pub fn save_news<Tz: TimeZone>(items: &[NewsItem], dir: &Path, date: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    let filepath = dir.join(timestamped_name(NEWS_PREFIX, date, "json"));
    let json = serde_json::to_string_pretty(items).context("Failed to serialize news items")?;
    fs::write(&filepath, json).context("Failed to write news file")?;

    Ok(filepath)
}

/// Load news items from a JSON file
pub fn load_news(filepath: &Path) -> Result<Vec<NewsItem>> {
    if !filepath.exists() {
        anyhow::bail!("News file not found: {}", filepath.display());
    }

    let content = fs::read_to_string(filepath)
        .with_context(|| format!("Failed to read news file: {}", filepath.display()))?;

    let items: Vec<NewsItem> = serde_json::from_str(&content).with_context(|| {
        format!(
            "Failed to parse news JSON from {}. Expected an array of news items.",
            filepath.display()
        )
    })?;

    Ok(items)
}

/// Save the run summary next to the report
pub fn save_stats<Tz: TimeZone>(stats: &AnalysisStats, dir: &Path, date: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz::Offset: std::fmt::Display,
{
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    let filepath = dir.join(timestamped_name(STATS_PREFIX, date, "json"));
    let json = serde_json::to_string_pretty(stats).context("Failed to serialize run stats")?;
    fs::write(&filepath, json).context("Failed to write stats file")?;

    Ok(filepath)
}

/// Newest file in `dir` named `{prefix}*.{ext}`. Timestamped names sort
/// chronologically, so the lexicographically last one wins.
pub fn latest_file(dir: &Path, prefix: &str, ext: &str) -> Result<Option<PathBuf>> {
    if !dir.exists() {
        return Ok(None);
    }

    let mut matches: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let name_ok = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(prefix))
                .unwrap_or(false);
            let ext_ok = path.extension().and_then(|e| e.to_str()) == Some(ext);
            name_ok && ext_ok
        })
        .collect();

    matches.sort();
    Ok(matches.pop())
}
