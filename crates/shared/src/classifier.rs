use crate::config::AnalyzerConfig;
use crate::models::NewsItem;
use crate::vocabulary::GENERAL_SECTOR;

/// One sector and the keywords that claim an item for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorRule {
    name: String,
    keywords: Vec<String>,
}

impl SectorRule {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `text` must already be lowercase.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorBucket {
    pub sector: String,
    pub items: Vec<NewsItem>,
}

/// Items grouped by sector, in rule order with `general` last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorBuckets {
    buckets: Vec<SectorBucket>,
}

impl SectorBuckets {
    pub fn get(&self, sector: &str) -> Option<&[NewsItem]> {
        self.buckets
            .iter()
            .find(|b| b.sector == sector)
            .map(|b| b.items.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SectorBucket> {
        self.buckets.iter()
    }

    /// Per-sector item counts, empty sectors included
    pub fn counts(&self) -> Vec<(String, usize)> {
        self.buckets
            .iter()
            .map(|b| (b.sector.clone(), b.items.len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }
}

/// First-match-wins sector classifier. Rules sharing a name, including one
/// named `general`, feed a single bucket.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<SectorRule>,
    /// Bucket names in first-appearance order, `general` last
    sectors: Vec<String>,
    /// Bucket index for each rule
    slots: Vec<usize>,
}

impl Classifier {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let rules = config.sectors.clone();
        let mut sectors: Vec<String> = Vec::new();
        for rule in &rules {
            if rule.name() != GENERAL_SECTOR && !sectors.iter().any(|s| s == rule.name()) {
                sectors.push(rule.name().to_string());
            }
        }
        sectors.push(GENERAL_SECTOR.to_string());

        let slots = rules
            .iter()
            .map(|rule| {
                sectors
                    .iter()
                    .position(|s| s == rule.name())
                    .unwrap_or(sectors.len() - 1)
            })
            .collect();

        Self {
            rules,
            sectors,
            slots,
        }
    }

    /// Name of the first sector whose keywords occur in the item, or `general`
    pub fn classify(&self, item: &NewsItem) -> &str {
        &self.sectors[self.slot_for(item)]
    }

    fn slot_for(&self, item: &NewsItem) -> usize {
        let text = item.match_text();
        self.rules
            .iter()
            .position(|rule| rule.matches(&text))
            .map(|i| self.slots[i])
            .unwrap_or(self.sectors.len() - 1)
    }

    pub fn categorize(&self, items: &[NewsItem]) -> SectorBuckets {
        let mut buckets: Vec<SectorBucket> = self
            .sectors
            .iter()
            .map(|sector| SectorBucket {
                sector: sector.clone(),
                items: Vec::new(),
            })
            .collect();

        for item in items {
            buckets[self.slot_for(item)].items.push(item.clone());
        }

        SectorBuckets { buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier_with(rules: Vec<SectorRule>) -> Classifier {
        Classifier::new(&AnalyzerConfig {
            sectors: rules,
            ..AnalyzerConfig::default()
        })
    }

    #[test]
    fn test_icici_goes_to_banking() {
        let classifier = Classifier::new(&AnalyzerConfig::default());
        let item = NewsItem::new("ICICI Bank reports 20% profit growth", "");
        assert_eq!(classifier.classify(&item), "banking");
    }

    #[test]
    fn test_first_match_wins_over_later_sectors() {
        let classifier = Classifier::new(&AnalyzerConfig::default());
        // Matches both pharma ("sun pharma") and power ("energy"); pharma comes first
        let item = NewsItem::new("Sun Pharma signs energy deal", "");
        assert_eq!(classifier.classify(&item), "pharma");
    }

    #[test]
    fn test_rule_order_decides_multi_sector_items() {
        let item = NewsItem::new("Steel maker buys coal mine", "");
        let metals_first = classifier_with(vec![
            SectorRule::new("metals", ["steel"]),
            SectorRule::new("power", ["coal"]),
        ]);
        let power_first = classifier_with(vec![
            SectorRule::new("power", ["coal"]),
            SectorRule::new("metals", ["steel"]),
        ]);
        assert_eq!(metals_first.classify(&item), "metals");
        assert_eq!(power_first.classify(&item), "power");
    }

    #[test]
    fn test_unmatched_goes_to_general() {
        let classifier = classifier_with(vec![SectorRule::new("banking", ["bank"])]);
        assert_eq!(classifier.classify(&NewsItem::new("Monsoon arrives early", "")), "general");
        assert_eq!(classifier.classify(&NewsItem::default()), "general");
    }

    #[test]
    fn test_description_participates_in_matching() {
        let classifier = classifier_with(vec![SectorRule::new("aviation", ["airline"])]);
        let item = NewsItem::new("Shares jump", "The Airline added routes");
        assert_eq!(classifier.classify(&item), "aviation");
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let rule = SectorRule::new("banking", ["HDFC"]);
        assert!(rule.matches("hdfc bank q4"));
    }

    #[test]
    fn test_categorize_keeps_order_and_empty_sectors() {
        let classifier = classifier_with(vec![
            SectorRule::new("banking", ["bank"]),
            SectorRule::new("auto", ["motor"]),
        ]);
        let items = vec![
            NewsItem::new("Bank A", ""),
            NewsItem::new("Rain", ""),
            NewsItem::new("Bank B", ""),
        ];
        let buckets = classifier.categorize(&items);

        assert_eq!(
            buckets.counts(),
            vec![
                ("banking".to_string(), 2),
                ("auto".to_string(), 0),
                ("general".to_string(), 1),
            ]
        );
        let banking: Vec<&str> = buckets
            .get("banking")
            .unwrap()
            .iter()
            .map(|i| i.headline.as_str())
            .collect();
        assert_eq!(banking, vec!["Bank A", "Bank B"]);
        assert_eq!(buckets.total(), 3);
    }

    #[test]
    fn test_rule_named_general_merges_into_general_bucket() {
        let classifier = classifier_with(vec![
            SectorRule::new("banking", ["bank"]),
            SectorRule::new("general", ["monsoon"]),
            SectorRule::new("banking", ["nbfc"]),
        ]);
        let items = vec![
            NewsItem::new("Monsoon arrives early", ""),
            NewsItem::new("Bank A", ""),
            NewsItem::new("Rain", ""),
            NewsItem::new("NBFC lending rises", ""),
        ];
        let buckets = classifier.categorize(&items);

        assert_eq!(
            buckets.counts(),
            vec![("banking".to_string(), 2), ("general".to_string(), 2)]
        );
        assert_eq!(buckets.get("general").unwrap().len(), 2);
        assert_eq!(classifier.classify(&items[0]), "general");
        assert_eq!(classifier.classify(&items[3]), "banking");
    }

    #[test]
    fn test_categorize_empty_input() {
        let classifier = Classifier::new(&AnalyzerConfig::default());
        let buckets = classifier.categorize(&[]);
        assert_eq!(buckets.total(), 0);
        assert_eq!(buckets.iter().count(), 11);
    }
}
