use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::batcher::batch;
use crate::classifier::Classifier;
use crate::config::AnalyzerConfig;
use crate::models::NewsItem;
use crate::prioritizer::Prioritizer;
use crate::prompts;
use crate::summarizer::{ChatModel, SummarizeError, Summarizer};

/// Result slot for one summarized batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInsight {
    /// 1-based
    pub batch_num: usize,
    pub item_count: usize,
    pub outcome: Result<String, SummarizeError>,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub total_news_items: usize,
    pub sector_summary: Vec<(String, usize)>,
    pub batch_insights: Vec<BatchInsight>,
    pub final_report: Result<String, SummarizeError>,
    pub api_calls_used: usize,
    pub analysis_timestamp: String,
}

impl AnalysisResult {
    pub fn failed_batches(&self) -> usize {
        self.batch_insights
            .iter()
            .filter(|b| b.outcome.is_err())
            .count()
    }

    /// Consolidated report text, or an inline error line if consolidation failed
    pub fn report_text(&self) -> String {
        match &self.final_report {
            Ok(text) => text.clone(),
            Err(e) => format!("Error: {}", e),
        }
    }

    pub fn stats(&self) -> AnalysisStats {
        AnalysisStats {
            total_news_items: self.total_news_items,
            sector_summary: self.sector_summary.clone(),
            batches: self.batch_insights.len(),
            failed_batches: self.failed_batches(),
            api_calls_used: self.api_calls_used,
            analysis_timestamp: self.analysis_timestamp.clone(),
        }
    }
}

/// Serializable run summary written next to the report
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisStats {
    pub total_news_items: usize,
    pub sector_summary: Vec<(String, usize)>,
    pub batches: usize,
    pub failed_batches: usize,
    pub api_calls_used: usize,
    pub analysis_timestamp: String,
}

/// Prioritize, classify, batch and summarize a run's worth of news
pub struct NewsAnalyzer<M> {
    config: AnalyzerConfig,
    prioritizer: Prioritizer,
    classifier: Classifier,
    summarizer: Summarizer<M>,
}

impl<M: ChatModel> NewsAnalyzer<M> {
    pub fn new(config: AnalyzerConfig, model: M) -> Self {
        let summarizer = Summarizer::new(model, config.retry.clone(), config.inter_batch_delay);
        Self {
            prioritizer: Prioritizer::new(&config),
            classifier: Classifier::new(&config),
            summarizer,
            config,
        }
    }

    pub fn summarizer(&self) -> &Summarizer<M> {
        &self.summarizer
    }

    /// Returns `None` when there is nothing to analyze.
    pub async fn analyze(&self, news: &[NewsItem]) -> Option<AnalysisResult> {
        if news.is_empty() {
            info!("No news items to analyze");
            return None;
        }

        info!("Starting consolidated analysis of {} news items", news.len());

        let prioritized = self.prioritizer.prioritize(news);
        let sector_summary = self.classifier.categorize(&prioritized).counts();
        info!(?sector_summary, "News categorized");

        let batches = batch(&prioritized, self.config.batch_size);
        let total_batches = batches.len();
        info!("Processing {} batches for key insights", total_batches);

        let mut batch_insights = Vec::with_capacity(total_batches);
        let mut api_calls_used = 0;

        for (i, items) in batches.iter().enumerate() {
            let batch_num = i + 1;
            info!(
                "Extracting insights from batch {}/{} ({} items)",
                batch_num,
                total_batches,
                items.len()
            );

            let prompt = prompts::batch_prompt(items, batch_num, total_batches);
            let outcome = self.summarizer.summarize(&prompt).await;
            api_calls_used += 1;

            if let Err(e) = &outcome {
                warn!(batch_num, error = %e, "Batch summary failed; continuing with partial data");
            }

            batch_insights.push(BatchInsight {
                batch_num,
                item_count: items.len(),
                outcome,
            });

            if batch_num < total_batches {
                self.summarizer.pause_between_calls().await;
            }
        }

        info!("Generating final consolidated report");
        let prompt = prompts::consolidation_prompt(&batch_insights, &sector_summary, news.len());
        let final_report = self.summarizer.summarize(&prompt).await;
        api_calls_used += 1;

        if let Err(e) = &final_report {
            warn!(error = %e, "Consolidation failed");
        }

        Some(AnalysisResult {
            total_news_items: news.len(),
            sector_summary,
            batch_insights,
            final_report,
            api_calls_used,
            analysis_timestamp: Utc::now().to_rfc3339(),
        })
    }
}
