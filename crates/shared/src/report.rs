use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analyzer::AnalysisResult;
use crate::prompts::title_case;

pub const REPORT_PREFIX: &str = "pulse_news_report_";

pub struct ReportGenerator;

impl ReportGenerator {
    /// "Banking: 3 | General: 2" for every non-empty sector
    fn sector_line(sector_summary: &[(String, usize)]) -> String {
        sector_summary
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(sector, count)| format!("{}: {}", title_case(sector), count))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    pub fn generate<Tz: TimeZone>(result: &AnalysisResult, prepared_at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut report = String::new();
        let stamp = prepared_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let width = 66;

        report.push_str(&format!("╔{}╗\n", "═".repeat(width)));
        report.push_str(&format!(
            "║{:^width$}║\n",
            "📈 STRUCTURED FINANCIAL NEWS REPORT 📈",
            width = width - 2
        ));
        report.push_str(&format!("║{:^width$}║\n", stamp, width = width));
        report.push_str(&format!("╚{}╝\n\n", "═".repeat(width)));

        report.push_str(&format!(
            "📊 **Analysis Summary**: {} news items analyzed across sectors: {}\n\n",
            result.total_news_items,
            Self::sector_line(&result.sector_summary)
        ));

        report.push_str(result.report_text().trim());
        report.push_str("\n\n");

        let failed = result.failed_batches();
        if failed > 0 {
            report.push_str(&format!(
                "⚠️ {} of {} batches could not be summarized; the report is based on partial data.\n\n",
                failed,
                result.batch_insights.len()
            ));
        }

        report.push_str(&format!(
            "*Note: The news analysis is based on {} items processed through {} AI analysis calls for comprehensive coverage.*\n",
            result.total_news_items, result.api_calls_used
        ));

        report
    }

    pub fn save<Tz: TimeZone>(content: &str, dir: &Path, date: &DateTime<Tz>) -> Result<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

        let filename = format!(
            "{}{}.txt",
            REPORT_PREFIX,
            date.format("%Y-%m-%d_%H-%M-%S")
        );
        let filepath = dir.join(filename);

        fs::write(&filepath, content).context("Failed to write report file")?;

        Ok(filepath)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::BatchInsight;
    use crate::summarizer::SummarizeError;
    use chrono::Utc;

    fn result(final_report: Result<String, SummarizeError>, failed: bool) -> AnalysisResult {
        AnalysisResult {
            total_news_items: 20,
            sector_summary: vec![
                ("banking".to_string(), 5),
                ("technology".to_string(), 0),
                ("oil_gas".to_string(), 3),
                ("general".to_string(), 12),
            ],
            batch_insights: vec![
                BatchInsight {
                    batch_num: 1,
                    item_count: 15,
                    outcome: Ok("one".to_string()),
                },
                BatchInsight {
                    batch_num: 2,
                    item_count: 5,
                    outcome: if failed {
                        Err(SummarizeError::RateLimited)
                    } else {
                        Ok("two".to_string())
                    },
                },
            ],
            final_report,
            api_calls_used: 3,
            analysis_timestamp: "2025-05-27T09:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_sector_line_skips_empty_sectors() {
        let r = result(Ok(String::new()), false);
        assert_eq!(
            ReportGenerator::sector_line(&r.sector_summary),
            "Banking: 5 | Oil_Gas: 3 | General: 12"
        );
    }

    #[test]
    fn test_generate_contains_summary_body_and_note() {
        let date = Utc.with_ymd_and_hms(2025, 5, 27, 9, 30, 0).unwrap();
        let report = ReportGenerator::generate(
            &result(Ok("**Key Sector Trends**\n- Banks up".to_string()), false),
            &date,
        );
        assert!(report.contains("2025-05-27 09:30:00"));
        assert!(report.contains("20 news items analyzed across sectors: Banking: 5"));
        assert!(report.contains("**Key Sector Trends**\n- Banks up"));
        assert!(report.contains("processed through 3 AI analysis calls"));
        assert!(!report.contains("partial data"));
    }

    #[test]
    fn test_generate_flags_partial_data() {
        let date = Utc.with_ymd_and_hms(2025, 5, 27, 9, 30, 0).unwrap();
        let report = ReportGenerator::generate(&result(Ok("body".to_string()), true), &date);
        assert!(report.contains("1 of 2 batches could not be summarized"));
    }

    #[test]
    fn test_generate_inlines_consolidation_error() {
        let date = Utc.with_ymd_and_hms(2025, 5, 27, 9, 30, 0).unwrap();
        let report = ReportGenerator::generate(
            &result(
                Err(SummarizeError::Api {
                    status: 500,
                    body: "boom".to_string(),
                }),
                false,
            ),
            &date,
        );
        assert!(report.contains("Error: API error 500: boom"));
    }

    #[test]
    fn test_save_uses_timestamped_name() {
        let dir = std::env::temp_dir().join(format!("pulse-report-test-{}", std::process::id()));
        let date = Utc.with_ymd_and_hms(2025, 5, 27, 9, 30, 5).unwrap();
        let path = ReportGenerator::save("hello", &dir, &date).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "pulse_news_report_2025-05-27_09-30-05.txt"
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        let _ = fs::remove_dir_all(&dir);
    }
}
