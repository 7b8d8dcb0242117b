//! vecgate CLI - command-line front end for the gateway engine.
//!
//! Every command prints exactly one JSON document (or, for `batch`, one JSON
//! line per request) on stdout. Logs go to stderr or the configured log file.
//!
//! ```text
//! main() -> GatewayConfig::load -> init_tracing -> GatewayOrchestrator
//!                                                        |
//!                                   health | state | fuzz | batch
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use vecgate_engine::{
    FuzzMode, FuzzRequest, GatewayConfig, GatewayOrchestrator, LogConfig, NoDecisionEngine,
    VectorBatch, run_batch,
};

#[derive(Parser)]
#[command(name = "vecgate")]
#[command(about = "Vector fuzzing gateway with a durable operation ledger", version)]
struct Cli {
    /// Config file (default: $VECGATE_CONFIG or ~/.vecgate/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness check
    Health,
    /// Print the persisted ledger
    State,
    /// Run one fuzz pass over a JSON list of vectors
    Fuzz {
        /// Input file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
        /// scrub or perturb
        #[arg(long, default_value = "scrub")]
        mode: FuzzMode,
        /// Cohesion threshold (default from config)
        #[arg(long)]
        threshold: Option<f64>,
        /// Skip the token drain
        #[arg(long)]
        no_tokens: bool,
        /// Perturbation seed (default from config)
        #[arg(long)]
        seed: Option<u64>,
        /// Perturbation bound (default from config)
        #[arg(long)]
        scale: Option<f64>,
    },
    /// Execute JSON-lines requests concurrently
    Batch {
        /// Input file, or `-` for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
}

fn init_tracing(log: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(path) = &log.file {
        match open_log_file(path) {
            Ok(file) => {
                tracing_subscriber::registry()
                    .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                    .with(env_filter)
                    .init();
                tracing::info!(path = %path.display(), "Logging initialized");
            }
            Err(e) => {
                init_stderr(env_filter);
                tracing::warn!("Failed to open log file {}: {e}", path.display());
            }
        }
        return;
    }

    init_stderr(env_filter);
}

fn init_stderr(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GatewayConfig::load(cli.config.as_deref()).context("failed to load config")?;
    init_tracing(&config.log);

    let gateway = Arc::new(
        GatewayOrchestrator::from_config(&config, Arc::new(NoDecisionEngine))
            .context("failed to open ledger")?,
    );

    match cli.command {
        Commands::Health => print_json(&serde_json::to_value(gateway.health())?),
        Commands::State => print_json(&serde_json::to_value(gateway.state().await)?),
        Commands::Fuzz {
            input,
            mode,
            threshold,
            no_tokens,
            seed,
            scale,
        } => {
            let raw = read_input(&input)?;
            let vectors: VectorBatch =
                serde_json::from_str(&raw).context("input is not a valid vector list")?;
            let req = FuzzRequest {
                vectors,
                mode,
                cosine_threshold: threshold,
                consume_tokens: !no_tokens,
                seed,
                perturb_scale: scale,
            };
            let resp = gateway.fuzz_run(&req).await?;
            print_json(&serde_json::to_value(resp)?)
        }
        Commands::Batch { input } => {
            let raw = read_input(&input)?;
            for response in run_batch(Arc::clone(&gateway), &raw).await {
                print_json(&response)?;
            }
            Ok(())
        }
    }
}
