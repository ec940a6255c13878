//! CLI argument parsing for throttledqueue

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::tau::Tau;

#[derive(Parser, Debug)]
#[command(name = "tq")]
#[command(author, version, about = "Rate-limited FIFO job dispatcher", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Push a burst of jobs and report when each one started
    Run {
        /// Minimum spacing between job starts in milliseconds
        #[arg(short, long)]
        tau_ms: Option<Tau>,

        /// Number of jobs to push (default: 5)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Reject pushes once this many jobs are pending
        #[arg(long)]
        capacity: Option<usize>,
    },

    /// Check whether a value is a valid throttle period
    Check {
        /// Candidate tau in milliseconds
        #[arg(required = true, allow_hyphen_values = true)]
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["tq", "run", "--tau-ms", "100", "--jobs", "3"]).unwrap();
        match cli.command {
            Command::Run { tau_ms, jobs, capacity } => {
                assert_eq!(tau_ms.unwrap().as_millis(), 100.0);
                assert_eq!(jobs, Some(3));
                assert_eq!(capacity, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_run_rejects_invalid_tau() {
        assert!(Cli::try_parse_from(["tq", "run", "--tau-ms", "NaN"]).is_err());
        assert!(Cli::try_parse_from(["tq", "run", "--tau-ms", "fast"]).is_err());
    }

    #[test]
    fn test_parse_check_negative() {
        let cli = Cli::try_parse_from(["tq", "check", "-1"]).unwrap();
        assert!(matches!(cli.command, Command::Check { value } if value == "-1"));
    }
}
