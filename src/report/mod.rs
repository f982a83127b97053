pub mod console;
pub mod format;
pub mod json;
pub mod junit;
pub mod markdown;
pub mod types;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::PathBuf;

use crate::runner::state::TestResult;
use crate::utils::Config;

/// Extra outputs written next to the markdown report
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub json: bool,
    pub junit: bool,
}

/// Paths of the files a run produced
#[derive(Debug, Clone)]
pub struct WrittenReports {
    pub markdown: PathBuf,
    pub json: Option<PathBuf>,
    pub junit: Option<PathBuf>,
}

impl WrittenReports {
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        std::iter::once(&self.markdown)
            .chain(self.json.iter())
            .chain(self.junit.iter())
    }
}

/// `API_TEST_REPORT_<YYYYMMDD_HHMMSS>.md`
pub fn report_file_name(now: &DateTime<Local>) -> String {
    format!("API_TEST_REPORT_{}.md", now.format("%Y%m%d_%H%M%S"))
}

fn results_file_name(now: &DateTime<Local>, ext: &str) -> String {
    format!("API_TEST_RESULTS_{}.{}", now.format("%Y%m%d_%H%M%S"), ext)
}

/// Write the markdown report, plus JSON/JUnit when requested
pub fn write_reports(
    results: &[TestResult],
    config: &Config,
    options: ReportOptions,
    now: DateTime<Local>,
) -> Result<WrittenReports> {
    let generated_at = now.format("%Y-%m-%d %H:%M:%S").to_string();

    let markdown_path = config.reports_dir.join(report_file_name(&now));
    let content = markdown::render(results, &generated_at, &config.base_url);
    std::fs::write(&markdown_path, content)
        .with_context(|| format!("Failed to write report: {}", markdown_path.display()))?;

    let run_report = types::TestRunReport::new(results, &config.base_url, generated_at);

    let json_path = if options.json {
        let path = config.reports_dir.join(results_file_name(&now, "json"));
        json::write_report(&run_report, &path)?;
        Some(path)
    } else {
        None
    };

    let junit_path = if options.junit {
        let path = config.reports_dir.join(results_file_name(&now, "xml"));
        junit::write_report(&run_report, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(WrittenReports {
        markdown: markdown_path,
        json: json_path,
        junit: junit_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_file_name() {
        let now = Local.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(report_file_name(&now), "API_TEST_REPORT_20260309_070501.md");
    }

    #[test]
    fn test_write_reports_all_formats() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::default().with_output_root(tmp.path());
        config.ensure_dirs().unwrap();

        let now = Local.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();
        let written = write_reports(
            &[],
            &config,
            ReportOptions {
                json: true,
                junit: true,
            },
            now,
        )
        .unwrap();

        assert_eq!(written.paths().count(), 3);
        let expected = "reports/API_TEST_REPORT_20260309_070501.md";
        assert!(written.markdown.ends_with(expected));
        let md = std::fs::read_to_string(&written.markdown).unwrap();
        assert!(md.contains("**Generated:** 2026-03-09 07:05:01"));
        assert!(written.json.as_ref().unwrap().exists());
        assert!(written.junit.as_ref().unwrap().exists());
    }

    #[test]
    fn test_write_reports_markdown_only() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::default().with_output_root(tmp.path());
        config.ensure_dirs().unwrap();

        let options = ReportOptions::default();
        let written = write_reports(&[], &config, options, Local::now()).unwrap();
        assert!(written.markdown.exists());
        assert!(written.json.is_none());
        assert!(written.junit.is_none());
    }
}
