use std::io::{stderr, stdout, BufWriter, Write};
use std::path::PathBuf;
use std::process::exit;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{error, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use statement_dashboard::client::HttpDashboardApi;
use statement_dashboard::config::DashboardConfig;
use statement_dashboard::models::DashboardSnapshot;
use statement_dashboard::store::DashboardStore;
use statement_dashboard::types::BankIdentifier;
use statement_dashboard::upload::{DispatchPhase, UploadDispatcher, UploadSelection};
use statement_dashboard::views;

const USAGE: &str = "Usage: statement-dashboard [--bank <Citi|UOB|DBS>] [--log-level <level>] [statement.pdf ...]";

/// Exit status when an upload was requested without a valid bank or without files.
const SELECTION_REJECTED: i32 = 2;

#[derive(Debug, Default)]
struct Arguments {
    bank: Option<String>,
    files: Vec<PathBuf>,
    log_level: Option<String>
}

#[tokio::main]
async fn main() -> Result<()> {
    //NOTE: Arguments are parsed by hand; move to clap if the command surface grows.
    let arguments = match parse_arguments(std::env::args().skip(1)) {
        Ok(Some(arguments)) => arguments,
        Ok(None) => {
            println!("{USAGE}");
            return Ok(());
        },
        Err(error) => {
            eprintln!("{error}");
            eprintln!("{USAGE}");
            eprintln!("Available log levels: error, warn, info, debug, trace (default: error)");
            exit(1);
        }
    };

    let log_level = arguments.log_level.as_deref()
        .map(parse_log_level).unwrap_or(LevelFilter::ERROR);

    setup_logging(log_level);

    let config = DashboardConfig::from_env()?;
    let api = Arc::new(HttpDashboardApi::new(&config)?);

    info!("Dashboard data from [{}], conversions via [{}]", config.api_url, config.convert_url);

    let store = DashboardStore::spawn(api.clone());
    let handle = store.handle();
    let mut snapshot = handle.settled().await;

    if arguments.bank.is_some() || !arguments.files.is_empty() {
        let dispatcher = UploadDispatcher::new(api, handle.clone())
            .with_concurrency(config.upload_concurrency);

        let mut selection = UploadSelection::new();
        selection.set_files(arguments.files);

        if let Some(bank) = arguments.bank.as_deref() {
            match BankIdentifier::from_str(bank) {
                Ok(bank) => selection.set_bank(bank),
                Err(error) => {
                    eprintln!("{error}");
                    eprintln!("{USAGE}");
                    shutdown(store).await;
                    exit(SELECTION_REJECTED);
                }
            }
        }

        match selection.submit(&dispatcher).await {
            Ok(report) => {
                if let Some(message) = report.failure_message() {
                    eprintln!("{message}");
                }

                if let Some(refreshed) = report.refreshed {
                    snapshot = refreshed;
                }
            },
            Err(rejection) => {
                eprintln!("{rejection}");
                shutdown(store).await;
                exit(SELECTION_REJECTED);
            }
        }
    }

    write_dashboard_to_stdout(&snapshot)?;

    shutdown(store).await;

    Ok(())
}

/// Returns `Ok(None)` when help was requested.
fn parse_arguments(mut args: impl Iterator<Item = String>) -> Result<Option<Arguments>> {
    let mut arguments = Arguments::default();

    while let Some(argument) = args.next() {
        match argument.as_str() {
            "-h" | "--help" => return Ok(None),
            "--bank" => {
                arguments.bank = Some(args.next().ok_or_else(|| anyhow!("--bank requires a value"))?);
            },
            "--log-level" => {
                arguments.log_level = Some(args.next().ok_or_else(|| anyhow!("--log-level requires a value"))?);
            },
            flag if flag.starts_with("--") => return Err(anyhow!("Unknown option '{flag}'")),
            _ => arguments.files.push(PathBuf::from(argument))
        }
    }

    Ok(Some(arguments))
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the rendered dashboard, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_dashboard_to_stdout(snapshot: &DashboardSnapshot) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());

    views::render_dashboard(&mut output, snapshot, DispatchPhase::default())?;

    output.flush()?;

    Ok(())
}

async fn shutdown(store: DashboardStore) {
    if let Err(error) = store.shutdown().await {
        error!("Dashboard store did not shut down gracefully: {error:?}");
    }
}
