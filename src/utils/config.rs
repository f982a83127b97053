use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Backend the suite is pointed at
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every scenario path is appended to
    pub base_url: String,

    /// Timeout applied to every request
    pub timeout: Duration,

    /// Directory the markdown report is written to
    pub reports_dir: PathBuf,

    /// Sibling directory for fixtures, created alongside the reports directory
    pub fixtures_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let test_dir = PathBuf::from("test");
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            reports_dir: test_dir.join("reports"),
            fixtures_dir: test_dir.join("fixtures"),
        }
    }
}

impl Config {
    /// Same defaults, but with every output directory rooted at `root`
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        self.reports_dir = root.join("reports");
        self.fixtures_dir = root.join("fixtures");
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create the reports and fixtures directories if they are missing
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.reports_dir, &self.fixtures_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}
