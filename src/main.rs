use clap::Parser;

use bible_api_tester::runner::{ConsoleEventListener, ReqwestTransport};
use bible_api_tester::{run_suite, Config, ReportOptions};

#[derive(Parser)]
#[command(name = "bible-api-tester")]
#[command(version)]
#[command(
    about = "Run the endpoint test suite against a local Bible Reading backend",
    long_about = "Runs every endpoint scenario in order against http://localhost:8000, \
                  prints a trace of each call and writes a markdown report under test/reports. \
                  Exits with status 1 if any scenario failed."
)]
struct Cli {
    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Also write the results as JSON next to the markdown report
    #[arg(long)]
    json: bool,

    /// Also write a JUnit XML report next to the markdown report
    #[arg(long)]
    junit: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::default();
    let transport = ReqwestTransport::new(config.timeout)?;
    let options = ReportOptions {
        json: cli.json,
        junit: cli.junit,
    };

    let mut listener = ConsoleEventListener::new();
    let outcome = run_suite(&config, Box::new(transport), options, &mut listener).await?;

    std::process::exit(outcome.exit_code());
}
