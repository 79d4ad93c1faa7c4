use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use shared::{
    default_data_dir, save_news, save_stats, AnalyzerConfig, Config, GroqClient, JsonFileSource,
    NewsAnalyzer, NewsSource, PublishedWindow, PulseScraper, ReportGenerator, TelegramConfig,
    TelegramPublisher,
};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pulse-report")]
#[command(about = "Scrape Zerodha Pulse and turn the day's news into a market intelligence report")]
struct Args {
    /// Analyze a saved news JSON file instead of scraping
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Only keep news published since this IST time, e.g. "12:00 AM, 27 May 2025"
    #[arg(short, long)]
    since: Option<String>,

    /// News items per model call
    #[arg(short, long, default_value = "15")]
    batch_size: NonZeroUsize,

    /// Time-text token that earns the recency bonus (defaults to the current month, e.g. "may 2025")
    #[arg(long)]
    recency_token: Option<String>,

    /// Directory for news, report and stats files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the Groq model name
    #[arg(long)]
    model: Option<String>,

    /// Send the finished report to Telegram
    #[arg(long)]
    publish: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    tokio::select! {
        result = run(args) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("\n⏹ Interrupted, exiting without a report.");
            Ok(())
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);
    let now = Local::now();

    let news = match &args.input {
        Some(path) => {
            println!("\n📂 Loading news from {}...", path.display());
            JsonFileSource::new(path).fetch().await?
        }
        None => {
            println!("\n🌐 Scraping Zerodha Pulse...");
            let mut scraper = PulseScraper::new()?;
            if let Some(since) = &args.since {
                scraper = scraper.with_window(PublishedWindow::since(since)?);
            }
            let news = scraper.fetch().await.context("Failed to scrape news")?;

            if !news.is_empty() {
                let path = save_news(&news, &data_dir, &now)?;
                println!("✓ Saved scraped news to {}", path.display());
            }
            news
        }
    };

    if news.is_empty() {
        println!("No news items to analyze.");
        return Ok(());
    }
    println!("✓ {} news items ready", news.len());

    let config = Config::from_env()?;
    let mut client = GroqClient::new(config.groq_api_key)?;
    if let Some(model) = args.model {
        client = client.with_model(model);
    }

    let analyzer_config = AnalyzerConfig::default().with_batch_size(args.batch_size);
    let analyzer_config = match args.recency_token {
        Some(token) => analyzer_config.with_recency_token(token),
        None => analyzer_config.with_recency_month(&now),
    };

    let batches = news.len().div_ceil(args.batch_size.get());
    println!(
        "\n🤖 Analyzing in {} batches of up to {} items ({} model calls)...",
        batches,
        args.batch_size,
        batches + 1
    );
    println!("  (This may take a few minutes...)");

    let analyzer = NewsAnalyzer::new(analyzer_config, client);
    let Some(result) = analyzer.analyze(&news).await else {
        println!("No news items to analyze.");
        return Ok(());
    };

    let failed = result.failed_batches();
    if failed > 0 {
        println!("⚠ {}/{} batches failed; report is based on partial data", failed, batches);
    }
    if let Err(e) = &result.final_report {
        println!("⚠ Consolidation failed: {}", e);
    }

    println!("\n📝 Generating report...");
    let report = ReportGenerator::generate(&result, &now);
    let report_path =
        ReportGenerator::save(&report, &data_dir, &now).context("Failed to save report")?;
    let stats_path = save_stats(&result.stats(), &data_dir, &now)?;

    println!("\n{}", report);
    println!("\n✅ Report saved to: {}", report_path.display());
    println!("✅ Stats saved to: {}", stats_path.display());

    if args.publish {
        println!("\n📨 Sending report to Telegram...");
        let publisher = TelegramPublisher::new(TelegramConfig::from_env()?)?;
        let sent = publisher.publish(&report).await?;
        println!("✓ Delivered in {} message(s)", sent);
    }

    Ok(())
}
