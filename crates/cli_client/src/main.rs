//! Terminal client for the folkchat line protocol
//!
//! Commands:
//! - `:folks` lists participants
//! - `:nick <nick>` changes the nick
//! - anything else is sent as a message
//!
//! New messages are polled whenever the connection has been idle for the
//! poll interval.

mod console;
mod line_editor;

use std::fs::File;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use folkchat_core::{ClientConfig, DEFAULT_HISTORY_LENGTH, DEFAULT_POLL_INTERVAL_MS};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::console::{PipedConsole, RawConsole};

/// folkchat - chat from the terminal
#[derive(Parser, Debug)]
#[command(name = "folkchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Terminal client for the folkchat line protocol", long_about = None)]
struct Args {
    /// Server host name or address
    host: String,

    /// Server port
    port: u16,

    /// Idle time before polling for new messages, in milliseconds
    #[arg(long, env = "FOLKCHAT_POLL_MS", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Prompt shown in front of the input line
    #[arg(long, env = "FOLKCHAT_PROMPT", default_value = "> ")]
    prompt: String,

    /// Number of input lines kept for recall with Up/Down
    #[arg(long, env = "FOLKCHAT_HISTORY", default_value_t = DEFAULT_HISTORY_LENGTH)]
    history: usize,

    /// Log level (off, error, warn, info, debug, trace); defaults to info
    /// with --log-file and off otherwise
    #[arg(short, long)]
    log_level: Option<String>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_prompt(self.prompt.clone())
            .with_history_len(self.history)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let code = match run(args).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("folkchat: {:#}", e);
            1
        }
    };
    // Exit right away: a pending stdin read would otherwise hold the runtime
    std::process::exit(code);
}

async fn run(args: Args) -> Result<()> {
    setup_logging(args.log_level.as_deref(), args.log_file.as_deref())?;
    info!("Starting folkchat v{}", env!("CARGO_PKG_VERSION"));

    let config = args.config();
    let stream = folkchat_core::connect(&args.host, args.port)
        .await
        .with_context(|| format!("Failed to connect to {}:{}", args.host, args.port))?;

    // Line editing needs a TTY; fall back to plain lines otherwise
    let raw = if std::io::stdin().is_terminal() {
        match RawConsole::open(&config) {
            Ok(console) => Some(console),
            Err(e) => {
                warn!("Raw mode not available: {}", e);
                None
            }
        }
    } else {
        None
    };

    let result = match raw {
        Some(mut console) => folkchat_core::run(&stream, &mut console, &config).await,
        None => {
            let mut console = PipedConsole::new();
            folkchat_core::run(&stream, &mut console, &config).await
        }
    };

    result.context("Session ended")?;
    info!("Disconnected");
    Ok(())
}

fn setup_logging(level: Option<&str>, file: Option<&Path>) -> Result<()> {
    let default_level = if file.is_some() {
        LevelFilter::INFO
    } else {
        LevelFilter::OFF
    };
    let log_level = level
        .and_then(|l| l.parse::<LevelFilter>().ok())
        .unwrap_or(default_level);

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    match file {
        Some(path) => {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .init();
        }
        None => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_require_host_and_port() {
        assert!(Args::try_parse_from(["folkchat"]).is_err());
        assert!(Args::try_parse_from(["folkchat", "localhost"]).is_err());
        assert!(Args::try_parse_from(["folkchat", "localhost", "not-a-port"]).is_err());
        assert!(Args::try_parse_from(["folkchat", "localhost", "4000", "extra"]).is_err());
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::try_parse_from([
            "folkchat",
            "chat.example.org",
            "4000",
            "--poll-interval-ms",
            "500",
            "--prompt",
            "$ ",
            "--history",
            "10",
        ])
        .unwrap();
        assert_eq!(args.host, "chat.example.org");
        assert_eq!(args.port, 4000);

        let config = args.config();
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.prompt, "$ ");
        assert_eq!(config.history_len, 10);
    }
}
