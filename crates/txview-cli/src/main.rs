//! txview - browse employee transactions from the terminal.
//!
//! Reads commands from stdin, one per line. Type `help` for the list.

mod args;
mod commands;
mod render;
mod session;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use txview_core::{Config, RequestCache, ViewController};

use args::{CliArgs, USAGE};
use commands::Command;
use session::{Outcome, Session};

/// Directory for daily rolling log files; stderr only when unset.
const ENV_LOG_DIR: &str = "TXVIEW_LOG_DIR";

const PROMPT: &str = "txview> ";

/// Initialize the tracing subscriber for logging.
///
/// Use RUST_LOG to control the level (e.g. RUST_LOG=txview_core=debug).
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "txview.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn load_config(args: &CliArgs) -> Config {
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });
    config.apply_env();
    args.apply_to(&mut config);
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        print!("{}", USAGE);
        return Ok(());
    }

    let _log_guard = init_tracing();
    info!("txview starting");

    let config = load_config(&args);
    if args.save_config {
        let path = config.save()?;
        println!("Saved configuration to {}", path.display());
    }

    let backend = config.build_backend()?;
    let view = ViewController::new(backend, Arc::new(RequestCache::new()));
    let mut session = Session::new(view, config.backend_description());

    println!("Connected to {}. Type `help` for commands.", config.backend_description());
    match session.start().await {
        Ok(listing) => println!("{}", listing),
        Err(e) => eprintln!("Error: {:#}", e),
    }

    let result = run_repl(&mut session).await;

    info!("txview shutting down");
    result
}

async fn run_repl(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", PROMPT);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match session.execute(command).await {
            Ok(Outcome::Continue(output)) => println!("{}", output),
            Ok(Outcome::Quit) => return Ok(()),
            Err(e) => eprintln!("Error: {:#}", e),
        }
    }
}
