use super::types::TestRunReport;
use anyhow::{Context, Result};
use std::path::Path;

/// Write the run as pretty-printed JSON
pub fn write_report(report: &TestRunReport<'_>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON report: {}", path.display()))?;
    Ok(())
}
