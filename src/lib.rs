pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use report::ReportOptions;
pub use runner::{run_suite, RunOutcome};
pub use utils::Config;
