/*!
# Vigil - A Console Prayer Journal

Vigil is a command-line tool for keeping a prayer journal through short,
guided sessions. Each session walks a fixed sequence of screens: a welcome,
devotional text, collection of new prayers, review of past prayers, and a
closing. Prayers and session statistics persist between runs in plain JSON
files.

This file contains the main application flow, coordinating the various
components to implement the session.

## Usage

```
vigil [OPTIONS]

Options:
  -d, --data-dir <DIR>          Directory holding the journal's data files
      --seed <N>                Seed for the review-selection RNG
  -v, --verbose                 Enable verbose output
      --log-format <FORMAT>     Log output format: text or json
  -h, --help                    Print help information
  -V, --version                 Print version information
```

## Configuration

The application can be configured with the following environment variables:
- `VIGIL_DIR`: The directory holding the data files (defaults to "~/.vigil")
- `VIGIL_LOG`: A tracing filter directive overriding the default log level
*/

use chrono::Local;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vigil::app::App;
use vigil::cli::CliArgs;
use vigil::config::Config;
use vigil::console::StdConsole;
use vigil::constants::{DEFAULT_LOG_LEVEL, ENV_VAR_VIGIL_LOG, LOG_FORMAT_JSON};
use vigil::errors::{AppError, AppResult};
use vigil::store::Store;

fn init_tracing(args: &CliArgs) -> AppResult<()> {
    let level = if args.verbose {
        "debug"
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter =
        EnvFilter::try_from_env(ENV_VAR_VIGIL_LOG).unwrap_or_else(|_| EnvFilter::new(level));

    let result = if args.log_format == LOG_FORMAT_JSON {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| AppError::Config(format!("Failed to initialize logging: {}", e)))
}

/// The main entry point for the vigil application.
///
/// This function coordinates the overall application flow:
/// 1. Parses command-line arguments and initializes logging
/// 2. Resolves and validates the data directory
/// 3. Opens the repository, seeding defaults on first run
/// 4. Builds the session (state machine, screens, selector state)
/// 5. Runs the session loop and persists at orderly shutdown
///
/// # Returns
///
/// A Result that is Ok(()) if the session ran to completion, or an AppError
/// if an unrecoverable configuration, storage or navigation error occurred.
/// The process exits non-zero on error.
fn main() -> AppResult<()> {
    let args = CliArgs::parse();
    init_tracing(&args)?;

    info!("Starting vigil");
    let config = Config::load(args.data_dir.as_deref())?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    let store = Store::open(&config.data_dir)?;

    let today = Local::now().date_naive();
    let mut app = App::new(store, StdConsole::new(), args.seed, today)?;
    app.run()?;

    info!("Session complete");
    Ok(())
}
