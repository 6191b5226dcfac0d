//! ATM Engine CLI
//!
//! Reads a cash float and a list of customer sessions, then prints one line
//! per outcome: the balance, or `ACCOUNT_ERR` / `FUNDS_ERR` / `ATM_ERR`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- sessions.txt
//! cargo run -- --strict sessions.txt
//! ATM_INPUT_FILE=sessions.txt cargo run
//! cat sessions.txt | cargo run
//! ```
//!
//! # Environment Variables
//!
//! - `ATM_INPUT_FILE`: Input path used when none is given on the command line
//! - `RUST_LOG`: Logging verbosity, `warn` by default so skipped sessions are reported

use atm_engine::{parse_reader, AtmEngine, Config, InputSource, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    // skipped malformed sessions must be visible without RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;

    let parsed = match &config.input {
        InputSource::File(path) => {
            let file = File::open(path)?;
            parse_reader(BufReader::new(file), config.mode)?
        }
        InputSource::Stdin => parse_reader(io::stdin().lock(), config.mode)?,
    };

    let skipped = parsed.skipped.len();
    let mut engine = AtmEngine::new(parsed.cash_float);

    let stdout = io::stdout();
    let handle = stdout.lock();
    let summary = engine.run(parsed.sessions, handle)?;

    info!(
        "Processed {} session(s), {} outcome(s), {} failed PIN, {} skipped as malformed; ATM cash left {}",
        summary.sessions, summary.outcomes, summary.rejected_sessions, skipped, summary.cash_float
    );

    Ok(())
}
