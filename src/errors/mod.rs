//! Error handling utilities for the vigil application.
//!
//! This module provides the central error type `AppError` which represents all
//! possible error conditions that might occur in the application, as well as the
//! convenience type alias `AppResult` for functions that can return these errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Represents specific error cases that can occur when reading or writing the
/// JSON data files backing the journal.
///
/// Each variant captures the path involved and the underlying error so that a
/// failure at shutdown or startup can be reported with full context.
///
/// # Examples
///
/// ```
/// use vigil::errors::StorageError;
/// use std::io::{self, ErrorKind};
/// use std::path::PathBuf;
///
/// let error = StorageError::ReadFailed {
///     path: PathBuf::from("/data/entries.json"),
///     source: io::Error::new(ErrorKind::NotFound, "file not found"),
/// };
///
/// assert!(format!("{}", error).contains("entries.json"));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error when a data file cannot be read.
    #[error("Failed to read data file {path}: {source}. Please check that the data directory exists and is readable.")]
    ReadFailed {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when a data file cannot be written.
    #[error("Failed to write data file {path}: {source}. Data for this session may be lost.")]
    WriteFailed {
        /// The file that could not be written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error when a data file exists but does not parse as the expected JSON shape.
    #[error("Malformed data in {path}: {source}")]
    Malformed {
        /// The file holding the malformed data
        path: PathBuf,
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// Error when in-memory data cannot be serialized for writing.
    #[error("Failed to encode data for {path}: {source}")]
    Encode {
        /// The destination file
        path: PathBuf,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

/// Represents mismatches between the state table and the rest of the
/// configuration data.
///
/// These indicate a configuration/data mismatch rather than a user mistake:
/// a well-formed data directory never produces them, but the run loop defends
/// against them anyway and aborts with context when one occurs.
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Error when no screen is bound to the current state's name.
    #[error("No screen found for state '{0}'. Check that screens.json defines a screen for every non-auto state.")]
    ScreenNotFound(String),

    /// Error when the machine's current name has no row in the state table.
    #[error("State '{0}' has no row in the state table. Check that every transition target in states.json names an existing state.")]
    UnknownState(String),

    /// Error when no transition matches the (current state, event) pair.
    #[error("No transition from state '{state}' on event '{event}'. Check states.json for a matching row.")]
    NoTransition {
        /// The state the machine was in
        state: String,
        /// The event produced by the handler
        event: String,
    },
}

/// Represents all possible errors that can occur in the vigil application.
///
/// This enum is the central error type used across the application, with variants
/// for different error categories. It uses `thiserror` for deriving the `Error` trait
/// implementation and formatted error messages.
///
/// # Examples
///
/// Creating a configuration error:
/// ```
/// use vigil::errors::AppError;
///
/// let error = AppError::Config("state table is empty".to_string());
/// assert_eq!(format!("{}", error), "Configuration error: state table is empty");
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or incomplete configuration data (state table, tags, parameters).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure to read or write the repository's backing store.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No matching screen or transition; indicates a configuration/data mismatch.
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// General I/O error (console reads, directory creation).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias for results produced anywhere in the application.
pub type AppResult<T> = Result<T, AppError>;
