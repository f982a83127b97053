use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use super::state::{RunSummary, TestResult};
use crate::report::console::render_result;

pub const BANNER_TITLE: &str = "Bible Reading Backend - API Endpoint Testing";

/// Run progress, in the order things happen
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    RunStarted {
        base_url: &'a str,
    },
    GroupStarted {
        title: &'a str,
    },
    ScenarioStarted {
        name: &'a str,
        method: &'a str,
        path: &'a str,
    },
    ScenarioFinished {
        result: &'a TestResult,
    },
    /// First token-gated scenario reached without a token
    AuthUnavailable,
    ScenarioSkipped {
        name: &'a str,
    },
    ReportStarted,
    ReportSaved {
        path: &'a Path,
    },
    RunFinished {
        summary: &'a RunSummary,
    },
}

/// Receives run events as they happen
pub trait EventListener {
    fn on_event(&mut self, event: RunEvent<'_>);
}

/// Listener that ignores everything
pub struct NullListener;

impl EventListener for NullListener {
    fn on_event(&mut self, _event: RunEvent<'_>) {}
}

/// Prints the run trace to stdout
pub struct ConsoleEventListener {
    spinner: Option<ProgressBar>,
    interactive: bool,
}

impl ConsoleEventListener {
    pub fn new() -> Self {
        Self {
            spinner: None,
            interactive: std::io::stdout().is_terminal(),
        }
    }

    fn banner(text: &str) {
        let rule = "=".repeat(60);
        println!();
        println!("{}", rule.blue().bold());
        println!("{}", text.blue().bold());
        println!("{}", rule.blue().bold());
        println!();
    }

    fn start_spinner(&mut self, method: &str, path: &str) {
        let pb = if self.interactive {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        };
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("  {spinner} {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(format!("{} {}...", method, path.dimmed()));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn clear_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Default for ConsoleEventListener {
    fn default() -> Self {
        Self::new()
    }
}

impl EventListener for ConsoleEventListener {
    fn on_event(&mut self, event: RunEvent<'_>) {
        match event {
            RunEvent::RunStarted { base_url } => {
                Self::banner(BANNER_TITLE);
                println!("  Target: {}", base_url.cyan());
            }

            RunEvent::GroupStarted { title } => {
                println!("\n{}", title.yellow());
            }

            RunEvent::ScenarioStarted { method, path, .. } => {
                self.start_spinner(method, path);
            }

            RunEvent::ScenarioFinished { result } => {
                self.clear_spinner();
                println!("{}", render_result(result));
            }

            RunEvent::AuthUnavailable => {
                println!(
                    "\n{}",
                    "⚠ Warning: No auth token available, skipping protected endpoint tests"
                        .yellow()
                );
            }

            RunEvent::ScenarioSkipped { .. } => {}

            RunEvent::ReportStarted => {
                Self::banner("Generating Report...");
            }

            RunEvent::ReportSaved { path } => {
                println!(
                    "\n{}",
                    format!("✓ Report saved to: {}", path.display()).green()
                );
            }

            RunEvent::RunFinished { summary } => {
                println!("\n{}", "Test Summary:".bold());
                println!("  Total: {}", summary.total);
                println!("  {}", format!("Passed: {}", summary.passed).green());
                println!("  {}", format!("Failed: {}", summary.failed).red());
                println!("  Success Rate: {:.1}%", summary.success_rate);

                if !summary.all_passed() {
                    println!(
                        "\n{}",
                        "Note: Some tests failed. Check the report for details.".yellow()
                    );
                }
            }
        }
    }
}
