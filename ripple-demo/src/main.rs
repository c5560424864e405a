//! Ripple Demo
//!
//! Streams a handful of mock HTTP requests through an Observable, answering
//! each one with a fake handler and logging the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use ripple_core::rx::Handlers;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

mod config;
mod error;
mod request;
mod source;

use config::{DemoConfig, LogFormat, LoggingConfig};
use error::RequestError;
use request::{Request, Response, handle_complete, handle_error, handle_request, mock_requests};
use source::request_stream;

#[derive(Parser, Debug)]
#[command(name = "ripple-demo")]
#[command(about = "Stream mock HTTP requests through a ripple Observable", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level or filter directive (overrides the config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Log output format (overrides the config file)
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,

    /// Fail the stream at this request index
    #[arg(long)]
    fail_at: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => DemoConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DemoConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }
    if args.fail_at.is_some() {
        config.source.fail_at = args.fail_at;
    }

    init_tracing(&config.logging)?;

    info!("Starting ripple demo v{}", env!("CARGO_PKG_VERSION"));

    let requests = request_stream(mock_requests(&config.source.host), config.source.fail_at);
    let responses: Arc<Mutex<Vec<Response>>> = Arc::new(Mutex::new(Vec::new()));

    let answered = Arc::clone(&responses);
    let rejected = Arc::clone(&responses);
    let subscription = requests.subscribe(
        Handlers::new()
            .on_next(move |request: Request| answered.lock().push(handle_request(&request)))
            .on_error(move |err: RequestError| rejected.lock().push(handle_error(&err)))
            .on_complete(handle_complete),
    );

    subscription.unsubscribe();

    let responses = responses.lock();
    let succeeded = responses.iter().filter(|r| r.is_success()).count();
    info!(
        subscription_id = %subscription.id(),
        total = responses.len(),
        succeeded,
        failed = responses.len() - succeeded,
        "request stream finished"
    );

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = logging.env_filter().context("Invalid log level")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
