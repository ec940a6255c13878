use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tokio::time::Instant;
use tracing::{debug, info};

use throttledqueue::cli::{Cli, Command};
use throttledqueue::config::Config;
use throttledqueue::{QueueConfig, Tau, ThrottledQueue};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to install subscriber: {}", e))?;
    Ok(())
}

async fn run(queue_config: QueueConfig, jobs: usize) -> Result<()> {
    debug!(?queue_config, jobs, "run: called");
    let queue = ThrottledQueue::with_config(queue_config).context("Failed to create queue")?;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    println!("Pushing {} jobs with tau {}", jobs, queue.tau().to_string().cyan());
    let origin = Instant::now();
    for index in 0..jobs {
        let tx = tx.clone();
        let job = move || {
            let _ = tx.send((index, Instant::now()));
        };
        if let Err(e) = queue.try_push(job) {
            println!("{} job {} rejected: {}", "✗".red(), index, e);
        }
    }
    // Rejected jobs were dropped with their senders; the channel closes once
    // every accepted job has run
    drop(tx);

    let mut previous: Option<Instant> = None;
    while let Some((index, started)) = rx.recv().await {
        let offset = started - origin;
        match previous {
            Some(prev) => println!(
                "{} job {} started at {:>8.1?} (+{:.1?})",
                "✓".green(),
                index,
                offset,
                started - prev
            ),
            None => println!("{} job {} started at {:>8.1?}", "✓".green(), index, offset),
        }
        previous = Some(started);
    }

    let stats = queue.stats();
    println!(
        "Executed {} of {} jobs ({} rejected, peak pending {})",
        stats.total_executed,
        jobs,
        stats.total_rejected,
        stats.peak_pending
    );
    Ok(())
}

fn check(value: &str) -> Result<Tau> {
    let tau: Tau = value
        .parse()
        .with_context(|| format!("Invalid tau value {:?}", value))?;
    Ok(tau)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;
    info!("throttledqueue starting");

    match cli.command {
        Command::Run { tau_ms, jobs, capacity } => {
            let mut queue_config = config.queue.clone();
            if let Some(tau) = tau_ms {
                queue_config.tau = tau;
            }
            if capacity.is_some() {
                queue_config.max_pending = capacity;
            }
            run(queue_config, jobs.unwrap_or(config.jobs)).await?;
        }
        Command::Check { value } => {
            let tau = check(&value)?;
            println!("{} valid tau: {}", "✓".green(), tau.to_string().cyan());
        }
    }

    Ok(())
}
