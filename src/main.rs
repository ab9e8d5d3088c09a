mod bulk;
mod poller;
mod query;
mod store;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::web::Config;

#[derive(Parser)]
#[command(name = "sat-o-scope")]
#[command(about = "Satellite telemetry store and tracking API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// YAML config file; built-in defaults when omitted
        #[arg(long)]
        config: Option<String>,
    },
    /// Check a telemetry CSV file without importing it
    Validate { csv: String },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(config.as_deref()),
        Commands::Validate { csv } => validate(&csv),
    }
}

fn serve(path: Option<&str>) -> ExitCode {
    let config = match path {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let parsed = match bulk::parse_csv_file(path) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error validating {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Headers OK ({} of {} rows valid)",
        parsed.valid_rows(),
        parsed.total_rows()
    );
    for (i, row) in parsed.rows.iter().enumerate() {
        if let Err(e) = row {
            println!("  row {}: {}", i + 1, e);
        }
    }

    ExitCode::SUCCESS
}
