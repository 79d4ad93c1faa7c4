use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Reverse;

use crate::config::AnalyzerConfig;
use crate::models::{NewsItem, ScoredItem};

const HIGH_IMPACT_WEIGHT: u32 = 3;
const MARKET_MOVER_WEIGHT: u32 = 2;
const FIGURE_BONUS: u32 = 2;
const RECENCY_BONUS: u32 = 1;

/// Rupee amounts, crore figures and percentages
static FINANCIAL_FIGURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)rs\s*\d+|₹\s*\d+|\d+\s*crore|\d+\s*%").expect("financial figure regex")
});

/// Keyword-based relevance scoring for news items
#[derive(Debug, Clone)]
pub struct Prioritizer {
    high_impact: Vec<String>,
    market_movers: Vec<String>,
    recency_token: Option<String>,
}

impl Prioritizer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            high_impact: lowercase_all(&config.high_impact),
            market_movers: lowercase_all(&config.market_movers),
            recency_token: config.recency_token.as_ref().map(|t| t.to_lowercase()),
        }
    }

    pub fn score(&self, item: &NewsItem) -> u32 {
        let text = item.match_text();

        let high_impact = count_matches(&self.high_impact, &text) * HIGH_IMPACT_WEIGHT;
        let market_movers = count_matches(&self.market_movers, &text) * MARKET_MOVER_WEIGHT;

        let figures = if FINANCIAL_FIGURE.is_match(&text) {
            FIGURE_BONUS
        } else {
            0
        };

        let recency = match &self.recency_token {
            Some(token) if item.published_time_text.to_lowercase().contains(token.as_str()) => {
                RECENCY_BONUS
            }
            _ => 0,
        };

        high_impact + market_movers + figures + recency
    }

    /// Score every item, highest priority first. Equal scores keep their
    /// input order.
    pub fn score_all(&self, items: &[NewsItem]) -> Vec<ScoredItem> {
        let mut scored: Vec<ScoredItem> = items
            .iter()
            .map(|item| ScoredItem {
                priority: self.score(item),
                item: item.clone(),
            })
            .collect();

        // sort_by_key is stable
        scored.sort_by_key(|s| Reverse(s.priority));
        scored
    }

    pub fn prioritize(&self, items: &[NewsItem]) -> Vec<NewsItem> {
        self.score_all(items).into_iter().map(|s| s.item).collect()
    }
}

fn lowercase_all(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

fn count_matches(terms: &[String], text: &str) -> u32 {
    terms.iter().filter(|term| text.contains(term.as_str())).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prioritizer_with(high: &[&str], movers: &[&str], recency: Option<&str>) -> Prioritizer {
        let mut config = AnalyzerConfig {
            high_impact: high.iter().map(|s| s.to_string()).collect(),
            market_movers: movers.iter().map(|s| s.to_string()).collect(),
            ..AnalyzerConfig::default()
        };
        if let Some(token) = recency {
            config = config.with_recency_token(token);
        }
        Prioritizer::new(&config)
    }

    #[test]
    fn test_icici_example_scores_eight() {
        let prioritizer = Prioritizer::new(&AnalyzerConfig::default());
        let item = NewsItem::new("ICICI Bank reports 20% profit growth", "");
        // profit +3, growth +3, 20% +2
        assert_eq!(prioritizer.score(&item), 8);
    }

    #[test]
    fn test_plain_text_scores_zero() {
        let prioritizer = prioritizer_with(&["merger"], &["rbi"], None);
        assert_eq!(prioritizer.score(&NewsItem::new("Markets quiet", "")), 0);
        assert_eq!(prioritizer.score(&NewsItem::default()), 0);
    }

    #[test]
    fn test_term_counts_once_per_item() {
        let prioritizer = prioritizer_with(&["merger"], &[], None);
        let item = NewsItem::new("Merger talks", "merger merger merger");
        assert_eq!(prioritizer.score(&item), 3);
    }

    #[test]
    fn test_overlapping_term_counts_in_both_vocabularies() {
        let prioritizer = prioritizer_with(&["breakout"], &["breakout"], None);
        let item = NewsItem::new("Breakout stock to watch", "");
        assert_eq!(prioritizer.score(&item), 5);
    }

    #[test]
    fn test_substring_matching_is_not_word_aware() {
        let prioritizer = prioritizer_with(&["merger"], &[], None);
        // "demerger" contains "merger"
        assert_eq!(prioritizer.score(&NewsItem::new("Demerger approved", "")), 3);
    }

    #[test]
    fn test_exact_formula_three_n_two_m_plus_figure() {
        let prioritizer = prioritizer_with(
            &["dividend", "buyback", "upgrade"],
            &["sebi", "inflation"],
            None,
        );
        let item = NewsItem::new(
            "Dividend and buyback announced after upgrade",
            "SEBI nod; inflation cools; payout of Rs 500",
        );
        assert_eq!(prioritizer.score(&item), 3 * 3 + 2 * 2 + 2);
    }

    #[test]
    fn test_figure_patterns() {
        let prioritizer = prioritizer_with(&[], &[], None);
        for text in [
            "Rs 450 target",
            "rs450",
            "₹ 1,200 crore",
            "₹300",
            "500 crore order",
            "up 12 %",
            "up 12%",
            "RS 10",
        ] {
            assert_eq!(prioritizer.score(&NewsItem::new(text, "")), 2, "{}", text);
        }
        for text in ["percent gain", "crore", "rs. x", "₹ x"] {
            assert_eq!(prioritizer.score(&NewsItem::new(text, "")), 0, "{}", text);
        }
    }

    #[test]
    fn test_figure_in_description_counts() {
        let prioritizer = prioritizer_with(&[], &[], None);
        assert_eq!(prioritizer.score(&NewsItem::new("Quiet day", "volumes up 3%")), 2);
    }

    #[test]
    fn test_recency_bonus_uses_time_text_only() {
        let prioritizer = prioritizer_with(&[], &[], Some("May 2025"));
        let recent = NewsItem::new("Quiet day", "").with_time("12:27 AM, 27 May 2025");
        let older = NewsItem::new("Quiet day", "").with_time("09:00 PM, 30 Apr 2025");
        let in_text = NewsItem::new("Quiet day in May 2025", "");
        assert_eq!(prioritizer.score(&recent), 1);
        assert_eq!(prioritizer.score(&older), 0);
        assert_eq!(prioritizer.score(&in_text), 0);
    }

    #[test]
    fn test_no_recency_token_means_no_bonus() {
        let prioritizer = prioritizer_with(&[], &[], None);
        let item = NewsItem::new("Quiet day", "").with_time("12:27 AM, 27 May 2025");
        assert_eq!(prioritizer.score(&item), 0);
    }

    #[test]
    fn test_prioritize_sorts_descending_and_keeps_ties() {
        let prioritizer = prioritizer_with(&["merger"], &["rbi"], None);
        let items = vec![
            NewsItem::new("first plain", ""),
            NewsItem::new("rbi policy", ""),
            NewsItem::new("second plain", ""),
            NewsItem::new("merger", ""),
            NewsItem::new("rbi again", ""),
        ];
        let headlines: Vec<String> = prioritizer
            .prioritize(&items)
            .into_iter()
            .map(|i| i.headline)
            .collect();
        assert_eq!(
            headlines,
            vec!["merger", "rbi policy", "rbi again", "first plain", "second plain"]
        );
    }

    #[test]
    fn test_prioritize_leaves_input_untouched() {
        let prioritizer = prioritizer_with(&["merger"], &[], None);
        let items = vec![NewsItem::new("plain", ""), NewsItem::new("merger", "")];
        let before = items.clone();
        let _ = prioritizer.prioritize(&items);
        assert_eq!(items, before);
    }

    #[test]
    fn test_score_all_reports_priorities() {
        let prioritizer = prioritizer_with(&["merger"], &[], None);
        let scored = prioritizer.score_all(&[NewsItem::new("plain", ""), NewsItem::new("merger", "")]);
        let priorities: Vec<u32> = scored.iter().map(|s| s.priority).collect();
        assert_eq!(priorities, vec![3, 0]);
    }
}
