use anyhow::Context;
use clap::Parser;
use reqres_contract::configuration::get_configuration;
use reqres_contract::suite::{
    STARTUP_FAILURE_EXIT_CODE, Scenario, SuiteReport, run_suite, select_scenarios,
};
use reqres_contract::telemetry::{get_subscriber, init_subscriber};
use std::process::ExitCode;

/// Verifies the users and registration contract of the reqres REST API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run only this scenario (repeatable). Runs every scenario by default.
    #[arg(long = "only", value_name = "SCENARIO")]
    only: Vec<String>,

    /// List the available scenarios and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if args.list {
        for scenario in Scenario::ALL {
            println!("{:<24} {}", scenario.name(), scenario.description());
        }
        return ExitCode::SUCCESS;
    }

    // The report goes to stdout, logs go to stderr
    let subscriber = get_subscriber("reqres-contract".into(), "info".into(), std::io::stderr);
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("Failed to initialise logging: {:?}", e);
        return ExitCode::from(STARTUP_FAILURE_EXIT_CODE);
    }

    match run(args).await {
        Ok(report) => {
            println!("{}", report);
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to start the contract suite"
            );
            eprintln!("Error: {:?}", e);
            ExitCode::from(STARTUP_FAILURE_EXIT_CODE)
        }
    }
}

async fn run(args: Args) -> Result<SuiteReport, anyhow::Error> {
    let scenarios = select_scenarios(&args.only)?;
    let configuration = get_configuration().context("Failed to read configuration.")?;
    let client = configuration
        .target
        .client()
        .context("Failed to build the HTTP client.")?;
    Ok(run_suite(&client, &configuration.suite, &scenarios).await)
}
