//! l2switchd - L2 learning controller daemon
//!
//! Reads control-channel events as JSON lines (from `--replay <file>` or
//! stdin), runs them through the controller one at a time, and writes every
//! outbound OpenFlow command to stdout as one JSON line. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sdn_channel::OutboundCommand;
use sdn_l2switchd::{
    feed_events, run_event_loop, Controller, L2SwitchConfig, DEFAULT_CONFIG_PATH,
    EVENT_QUEUE_DEPTH,
};

#[derive(Debug, Parser)]
#[command(name = "l2switchd", version, about = "L2 learning controller with manual port blocking")]
struct Cli {
    /// TOML configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log filter, overrides the configured level (RUST_LOG wins over both)
    #[arg(long)]
    log_level: Option<String>,

    /// JSON-lines event file to replay instead of reading stdin
    #[arg(long)]
    replay: Option<PathBuf>,
}

/// Initializes tracing/logging on stderr.
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

async fn write_commands(mut commands: mpsc::UnboundedReceiver<OutboundCommand>) -> Result<usize> {
    let mut stdout = tokio::io::stdout();
    let mut written = 0usize;

    while let Some(command) = commands.recv().await {
        let mut line = serde_json::to_vec(&command).context("Failed to encode command")?;
        line.push(b'\n');
        stdout.write_all(&line).await.context("Failed to write command")?;
        written += 1;
    }

    stdout.flush().await?;
    Ok(written)
}

async fn run(cli: Cli) -> Result<()> {
    let config = L2SwitchConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level)?;

    info!("--- Starting l2switchd ---");
    info!(
        idle_timeout = config.flow.idle_timeout_secs,
        hard_timeout = config.flow.hard_timeout_secs,
        retain_state_on_reconnect = config.session.retain_state_on_reconnect,
        "Controller configuration loaded"
    );

    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let (out_tx, out_rx) = mpsc::unbounded_channel();

    let writer = tokio::spawn(write_commands(out_rx));
    let feeder = match cli.replay {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("Failed to open replay file {}", path.display()))?;
            info!(path = %path.display(), "Replaying events");
            tokio::spawn(feed_events(BufReader::new(file), event_tx))
        }
        None => {
            info!("Reading events from stdin");
            tokio::spawn(feed_events(BufReader::new(tokio::io::stdin()), event_tx))
        }
    };

    let mut controller = Controller::new(&config);
    run_event_loop(&mut controller, event_rx, out_tx).await;
    // Sessions own the last command senders.
    drop(controller);

    let queued = feeder.await.context("Feed task panicked")??;
    let written = writer.await.context("Writer task panicked")??;
    info!(queued, written, "l2switchd exiting normally");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "l2switchd error");
            eprintln!("l2switchd: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
