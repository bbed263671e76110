//! hevy-tcx - capture Hevy workouts and export them as TCX
//!
//! Subcommands:
//! - `hevy-tcx convert` - Convert a saved workout JSON file into a TCX file
//! - `hevy-tcx serve` - Run the capturing proxy with its export routes

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hevy_tcx::convert::{DEFAULT_INPUT_FILENAME, DEFAULT_OUTPUT_FILENAME};
use hevy_tcx::{convert_file, run_server, util, Config, TcxSerializer, WebAppState};

#[derive(Parser)]
#[command(name = "hevy-tcx")]
#[command(about = "Capture Hevy workouts and export them as TCX")]
#[command(version)]
struct Cli {
    /// Data directory for config and logs (default: ~/.hevy-tcx)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a workout JSON document into a TCX file
    Convert {
        /// Workout JSON file (default: input.json next to the executable)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// TCX file to write (default: output.tcx next to the executable)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Activity sport label
        #[arg(long)]
        sport: Option<String>,
    },

    /// Proxy the Hevy API, capture workouts and serve exports
    Serve {
        /// Host address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Upstream API base URL
        #[arg(long)]
        upstream: Option<String>,
    },
}

fn init_logging() -> Result<()> {
    // Initialize logging to file (~/.hevy-tcx/logs/hevy-tcx.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();
    Ok(())
}

fn convert(
    config: Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    sport: Option<String>,
) -> Result<()> {
    let base = util::executable_dir();
    let input = input.unwrap_or_else(|| base.join(DEFAULT_INPUT_FILENAME));
    let output = output.unwrap_or_else(|| base.join(DEFAULT_OUTPUT_FILENAME));

    let mut options = config.tcx;
    if let Some(sport) = sport {
        options.sport = sport;
    }

    let report = convert_file(&input, &output, &TcxSerializer::new(options))?;
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    println!("Success! Created '{}'", report.output.display());
    println!("Converted {} heart rate samples.", report.sample_count);
    println!("Workout Date: {}", report.workout_date);
    Ok(())
}

async fn serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
    upstream: Option<String>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(upstream) = upstream {
        config = config.with_upstream(upstream);
    }

    let server = config.server.clone();
    println!(
        "Capturing {} via http://{}:{} (export at /_tcx/export)",
        config.capture.upstream, server.host, server.port
    );
    run_server(WebAppState::new(config), server)
        .await
        .context("capture server failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    util::init_data_dir(cli.data_dir);
    init_logging()?;

    let config = Config::load();

    match cli.command {
        Commands::Convert {
            input,
            output,
            sport,
        } => convert(config, input, output, sport),
        Commands::Serve {
            host,
            port,
            upstream,
        } => serve(config, host, port, upstream).await,
    }
}
