/*!
# Vigil

Vigil is a single-user, console-driven prayer journal. It walks a session
through a fixed sequence of screens (welcome, devotional text, prayer
collection, review of past prayers, closing), persists prayer records and
lightweight session statistics between runs, and rotates through a bank of
devotional content across sessions.

## Core Features

- Guided sessions driven by a declarative state table
- Weighted, fairness-aware selection of past prayers for review
- Day-streak tracking and per-session statistics
- Devotional panel sets that rotate across sessions
- Plain JSON data files seeded with defaults on first run

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `cli`: Command-line interface handling using clap
- `config`: Data directory resolution and validation
- `errors`: Error handling infrastructure
- `machine`: The session state machine
- `selector`: Weighted review selection
- `model`: Plain data types (entries, tags, parameters, session counters)
- `screens`: Devotional screens and panel-set rotation
- `store`: The JSON-file repository
- `console`: The console seam and its stdin/stdout implementation
- `app`: The session driver and handlers

## Usage Example

```rust,no_run
use vigil::app::App;
use vigil::console::StdConsole;
use vigil::store::Store;
use std::path::Path;

fn main() -> vigil::AppResult<()> {
    let store = Store::open(Path::new("/home/user/.vigil"))?;
    let today = chrono::Local::now().date_naive();
    let mut app = App::new(store, StdConsole::new(), None, today)?;
    app.run()
}
```
*/

/// The session driver and handlers
pub mod app;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// The console seam between the core and the user
pub mod console;
/// Centralized constants
pub mod constants;
/// Error types and utilities for error handling
pub mod errors;
/// The session state machine
pub mod machine;
/// Plain data types for prayers, tags and session bookkeeping
pub mod model;
/// Devotional screens and panel-set rotation
pub mod screens;
/// Weighted selection of past prayers for review
pub mod selector;
/// The JSON-file repository
pub mod store;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use machine::{Action, State, StateMachine};
