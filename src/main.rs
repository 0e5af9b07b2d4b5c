//! admission-gate server
//!
//! Serves the gate endpoints and guarded placeholders behind the admission middleware.

use admission_gate::server;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "gate", version, about = "Request-admission gate server")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "GATE_CONFIG", default_value = "config/gate.yaml")]
    config: PathBuf,

    /// Emit logs as JSON
    #[arg(long, env = "GATE_LOG_JSON")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("admission_gate=info,actix_web=info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);
    if args.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match server::run_server(&args.config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
