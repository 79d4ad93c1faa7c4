use anyhow::{Context, Result};
use clap::Parser;
use shared::report::REPORT_PREFIX;
use shared::{chunk_message, default_data_dir, latest_file, TelegramConfig, TelegramPublisher};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "send-report")]
#[command(about = "Send a saved Pulse report to a Telegram chat")]
struct Args {
    /// Report file to send (defaults to the newest report in the data directory)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Directory searched for reports
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Show how the report would be split without sending anything
    #[arg(long)]
    dry_run: bool,
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

    let report_file = match args.file {
        Some(path) => path,
        None => {
            let dir = args.data_dir.unwrap_or_else(default_data_dir);
            latest_file(&dir, REPORT_PREFIX, "txt")?.ok_or_else(|| {
                anyhow::anyhow!("No {}*.txt files found in {}", REPORT_PREFIX, dir.display())
            })?
        }
    };

    println!("📖 Reading report: {}", report_file.display());
    let report = fs::read_to_string(&report_file)
        .with_context(|| format!("Failed to read report file: {}", report_file.display()))?;

    if report.trim().is_empty() {
        println!("Report is empty, nothing to send.");
        return Ok(());
    }

    if args.dry_run {
        let chunks = chunk_message(&report, shared::publisher::MESSAGE_CHAR_LIMIT);
        println!("Would send {} message(s):", chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            println!("  {}) {} UTF-16 units", i + 1, chunk.encode_utf16().count());
        }
        return Ok(());
    }

    println!("\n📨 Sending to Telegram...");
    let publisher = TelegramPublisher::new(TelegramConfig::from_env()?)?;
    let sent = publisher.publish(&report).await?;

    println!("\n✅ Delivered in {} message(s)", sent);

    Ok(())
}
