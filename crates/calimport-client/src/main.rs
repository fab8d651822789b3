//! calimport CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use calimport_client::cli::Cli;
use calimport_client::config::{ClientConfig, Settings};
use calimport_client::error::{ClientResult, ImportError};
use calimport_client::pipeline::{self, RunOutcome};
use calimport_core::{TracingConfig, init_tracing};
use calimport_providers::google::{GoogleAuthenticator, GoogleCalendarClient};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => ClientConfig::load_from(path),
        None => ClientConfig::load(),
    };
    let file_config = match file_config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let settings = Settings::resolve(&cli, &file_config);

    let tracing = TracingConfig::for_cli(settings.debug).with_format(settings.log_format);
    if let Err(e) = init_tracing(tracing) {
        eprintln!("warning: {}", e);
    }
    debug!("effective settings: {:?}", settings);

    let outcome = match pipeline::run(&settings, || connect(&settings)).await {
        Ok(outcome) => outcome,
        Err(e) => {
            report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    match print_outcome(&outcome) {
        Ok(()) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn connect(settings: &Settings) -> ClientResult<GoogleCalendarClient> {
    let authenticator =
        GoogleAuthenticator::new(settings.google_config()).map_err(ImportError::Auth)?;
    authenticator.connect().await.map_err(ImportError::Auth)
}

fn print_outcome(outcome: &RunOutcome) -> ClientResult<()> {
    match outcome {
        RunOutcome::Preview {
            calendar_name,
            timezone_name,
            payloads,
        } => {
            println!("Calendar: {} ({})", calendar_name, timezone_name);
            for payload in payloads {
                let json = serde_json::to_string_pretty(payload).map_err(|e| {
                    ImportError::Unexpected(format!("failed to serialize event: {}", e))
                })?;
                println!("{}", json);
            }
        }
        RunOutcome::Imported {
            calendar_name,
            report,
        } => {
            if report.calendar_created {
                println!("Created calendar '{}' ({})", calendar_name, report.calendar_id);
            }
            println!("{}", report.summary());
        }
    }
    Ok(())
}

fn report_error(err: &ImportError) {
    match err {
        ImportError::Config(e) if e.is_validation() => eprintln!("Validation Error: {}", e),
        e if e.is_logged() => {}
        e => eprintln!("error: {}", e),
    }
}
