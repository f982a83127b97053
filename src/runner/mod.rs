pub mod context;
pub mod events;
pub mod executor;
pub mod scenarios;
pub mod state;
pub mod transport;

use anyhow::Result;
use log::{info, warn};

pub use context::RunContext;
pub use events::*;
pub use executor::RequestExecutor;
pub use scenarios::{catalog, Capture, Gate, Scenario, ScenarioGroup};
pub use state::*;
pub use transport::{ReqwestTransport, Transport};

use crate::report::{self, ReportOptions, WrittenReports};
use crate::utils::Config;

/// Walks the catalog one scenario at a time, threading captured values forward
pub struct Sequencer {
    executor: RequestExecutor,
    context: RunContext,
    warned_no_token: bool,
}

impl Sequencer {
    pub fn new(executor: RequestExecutor, context: RunContext) -> Self {
        Self {
            executor,
            context,
            warned_no_token: false,
        }
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Run every group in order. Failures are recorded, never raised.
    pub async fn run(
        &mut self,
        groups: &[ScenarioGroup],
        listener: &mut dyn EventListener,
    ) -> Vec<TestResult> {
        let mut results = Vec::new();

        for group in groups {
            listener.on_event(RunEvent::GroupStarted { title: group.title });

            for scenario in &group.scenarios {
                if let Some(result) = self.run_scenario(scenario, listener).await {
                    results.push(result);
                }
            }
        }

        results
    }

    async fn run_scenario(
        &mut self,
        scenario: &Scenario,
        listener: &mut dyn EventListener,
    ) -> Option<TestResult> {
        let resolved = scenario.resolve(&self.context);

        if scenario.gate == Gate::RequiresToken && !self.context.has_token() {
            if !self.warned_no_token {
                warn!("No auth token available, skipping protected endpoint tests");
                listener.on_event(RunEvent::AuthUnavailable);
                self.warned_no_token = true;
            }
            info!("Skipping '{}': no auth token", resolved.name);
            listener.on_event(RunEvent::ScenarioSkipped {
                name: &resolved.name,
            });
            return None;
        }

        listener.on_event(RunEvent::ScenarioStarted {
            name: &resolved.name,
            method: resolved.method,
            path: &resolved.path,
        });

        let result = self
            .executor
            .execute(
                &resolved.name,
                resolved.method,
                &resolved.path,
                resolved.headers,
                resolved.body,
                None,
            )
            .await;

        match scenario.capture {
            Some(Capture::BookName) => self.context.capture_book(&result),
            Some(Capture::RegistrationToken) => self.context.capture_registration(&result),
            Some(Capture::LoginToken) => self.context.capture_login(&result),
            None => {}
        }

        listener.on_event(RunEvent::ScenarioFinished { result: &result });
        Some(result)
    }
}

/// Everything a finished run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub results: Vec<TestResult>,
    pub summary: RunSummary,
    pub reports: WrittenReports,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }
}

/// Run the full catalog against `config.base_url` and write the reports
pub async fn run_suite(
    config: &Config,
    transport: Box<dyn Transport>,
    options: ReportOptions,
    listener: &mut dyn EventListener,
) -> Result<RunOutcome> {
    config.ensure_dirs()?;

    listener.on_event(RunEvent::RunStarted {
        base_url: &config.base_url,
    });

    let executor = RequestExecutor::new(transport, config.base_url.clone());
    let mut sequencer = Sequencer::new(executor, RunContext::new());
    let results = sequencer.run(&catalog(), listener).await;

    listener.on_event(RunEvent::ReportStarted);
    let reports = report::write_reports(&results, config, options, chrono::Local::now())?;
    for path in reports.paths() {
        listener.on_event(RunEvent::ReportSaved { path });
    }

    let summary = RunSummary::from_results(&results);
    listener.on_event(RunEvent::RunFinished { summary: &summary });

    Ok(RunOutcome {
        results,
        summary,
        reports,
    })
}
