use crate::runner::state::{RunSummary, TestResult};
use serde::Serialize;

/// Machine-readable view of a run, shared by the JSON and JUnit outputs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRunReport<'a> {
    pub session_id: String,
    pub generated_at: String,
    pub base_url: &'a str,
    pub summary: RunSummary,
    pub results: Vec<ReportEntry<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry<'a> {
    #[serde(flatten)]
    pub result: &'a TestResult,
    pub success: bool,
}

impl<'a> TestRunReport<'a> {
    pub fn new(results: &'a [TestResult], base_url: &'a str, generated_at: String) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            generated_at,
            base_url,
            summary: RunSummary::from_results(results),
            results: results
                .iter()
                .map(|result| ReportEntry {
                    result,
                    success: result.success(),
                })
                .collect(),
        }
    }
}
