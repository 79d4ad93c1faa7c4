// Public modules
pub mod analyzer;
pub mod batcher;
pub mod classifier;
pub mod config;
pub mod fetcher;
pub mod io;
pub mod models;
pub mod prioritizer;
pub mod prompts;
pub mod publisher;
pub mod report;
pub mod summarizer;
pub mod vocabulary;

// Re-export commonly used types
pub use analyzer::{AnalysisResult, AnalysisStats, BatchInsight, NewsAnalyzer};
pub use batcher::batch;
pub use classifier::{Classifier, SectorBucket, SectorBuckets, SectorRule};
pub use config::{AnalyzerConfig, Config, TelegramConfig};
pub use fetcher::{JsonFileSource, NewsSource, PublishedWindow, PulseScraper};
pub use io::{default_data_dir, latest_file, load_news, save_news, save_stats, NEWS_PREFIX, STATS_PREFIX};
pub use models::{NewsItem, ScoredItem};
pub use prioritizer::Prioritizer;
pub use publisher::{chunk_message, TelegramPublisher};
pub use report::ReportGenerator;
pub use summarizer::{ChatModel, GroqClient, RetryPolicy, SummarizeError, Summarizer};
