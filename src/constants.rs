//! Constants used throughout the application.
//!
//! This module contains all constants used in the Vigil application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "vigil";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A console prayer journal with guided sessions";

// Configuration Keys & Environment Variables
/// Environment variable for specifying the Vigil data directory.
pub const ENV_VAR_VIGIL_DIR: &str = "VIGIL_DIR";
/// Environment variable for the tracing filter directive.
pub const ENV_VAR_VIGIL_LOG: &str = "VIGIL_LOG";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default sub-directory name for the data directory within the user's home directory.
pub const DEFAULT_DATA_SUBDIR: &str = ".vigil";

// Logging
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level when neither VIGIL_LOG nor --verbose is given.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

// Data Files
/// File holding all prayer entries.
pub const ENTRIES_FILE: &str = "entries.json";
/// File holding the tag catalogue with weights.
pub const TAGS_FILE: &str = "tags.json";
/// File holding tunable parameters and session carryover.
pub const PARAMS_FILE: &str = "params.json";
/// File holding the declarative state table.
pub const STATES_FILE: &str = "states.json";
/// File holding the devotional panel sets.
pub const SCREENS_FILE: &str = "screens.json";
/// File written by the `export` command at the continue prompt.
pub const EXPORT_FILE: &str = "export.json";

// Session Parameters
/// Default number of past prayers surfaced per review round.
pub const DEFAULT_BATCH_SIZE: usize = 3;
/// Tag assigned when the user leaves the category prompt blank.
pub const DEFAULT_FALLBACK_TAG: &str = "General";
/// Weight assumed for tags absent from the catalogue.
pub const DEFAULT_TAG_WEIGHT: u32 = 1;

// State Machine
/// Distinguished terminal state name; reaching it ends the main loop.
pub const TERMINAL_STATE: &str = "done";

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";

// Special Console Responses
/// Continue-prompt response that writes an export of all entries.
pub const EXPORT_COMMAND: &str = "export";
