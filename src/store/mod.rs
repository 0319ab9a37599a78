//! The JSON-file repository backing the journal.
//!
//! All persistent data lives as small JSON files in one data directory:
//! entries, the tag catalogue, tunable parameters with session carryover,
//! the state table and the devotional screens. Reads happen once at startup,
//! writes once at orderly shutdown; a fresh directory is seeded with the
//! built-in defaults on first run.
//!
//! The store owns the in-memory collections. The session core borrows read
//! access and issues discrete mutations (`append_entry`, `record_display`,
//! `resolve`) instead of reaching into shared structures.

use crate::constants::{
    ENTRIES_FILE, EXPORT_FILE, PARAMS_FILE, SCREENS_FILE, STATES_FILE, TAGS_FILE,
};
use crate::errors::{AppError, AppResult, StorageError};
use crate::machine::{default_states, State};
use crate::model::{union_tags, Entry, Params, Tag};
use crate::screens::{default_panel_sets, PanelSet};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ensures the data directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns `AppError::Config` if the path is not absolute, or `AppError::Io`
/// if directory creation fails.
pub fn ensure_data_directory_exists(data_dir: &Path) -> AppResult<()> {
    if !data_dir.is_absolute() {
        return Err(AppError::Config(format!(
            "Data directory path must be absolute: {}",
            data_dir.display()
        )));
    }

    if !data_dir.exists() {
        fs::create_dir_all(data_dir).map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create data directory: {}", e),
            ))
        })?;

        // Journal contents are personal; keep the directory owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o700);
            fs::set_permissions(data_dir, permissions).map_err(|e| {
                AppError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set permissions on data directory: {}", e),
                ))
            })?;
            debug!("Set 0o700 permissions on data directory");
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
    let raw = fs::read_to_string(path).map_err(|e| StorageError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&raw).map_err(|e| StorageError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let encoded = serde_json::to_string_pretty(value).map_err(|e| StorageError::Encode {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, encoded).map_err(|e| StorageError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// The repository of entries, tags and parameters for one run.
#[derive(Debug)]
pub struct Store {
    dir: PathBuf,
    entries: Vec<Entry>,
    tags: Vec<Tag>,
    params: Params,
}

impl Store {
    /// Opens the repository rooted at `dir`, seeding defaults on first run.
    ///
    /// Loads entries, tags and parameters; any file that does not exist yet
    /// is created with built-in defaults first. The tag catalogue is
    /// union'd with tags discovered on loaded entries.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Storage` when a file cannot be read, written or
    /// parsed, and `AppError::Config` when loaded data breaks an invariant
    /// (tag weight below 1, entry with empty content or tag).
    pub fn open(dir: &Path) -> AppResult<Self> {
        ensure_data_directory_exists(dir)?;

        let entries_path = dir.join(ENTRIES_FILE);
        if !entries_path.exists() {
            info!("Seeding empty {}", ENTRIES_FILE);
            write_json(&entries_path, &Vec::<Entry>::new())?;
        }
        let tags_path = dir.join(TAGS_FILE);
        if !tags_path.exists() {
            info!("Seeding default {}", TAGS_FILE);
            write_json(&tags_path, &default_tags())?;
        }
        let params_path = dir.join(PARAMS_FILE);
        if !params_path.exists() {
            info!("Seeding default {}", PARAMS_FILE);
            write_json(&params_path, &Params::default())?;
        }
        let states_path = dir.join(STATES_FILE);
        if !states_path.exists() {
            info!("Seeding default {}", STATES_FILE);
            write_json(&states_path, &default_states())?;
        }
        let screens_path = dir.join(SCREENS_FILE);
        if !screens_path.exists() {
            info!("Seeding default {}", SCREENS_FILE);
            write_json(&screens_path, &default_panel_sets())?;
        }

        let entries: Vec<Entry> = read_json(&entries_path)?;
        let catalogue: Vec<Tag> = read_json(&tags_path)?;
        let params: Params = read_json(&params_path)?;

        validate_entries(&entries)?;
        let tags = union_tags(catalogue, &entries);
        validate_tags(&tags)?;

        debug!(
            entries = entries.len(),
            tags = tags.len(),
            "Loaded repository"
        );

        Ok(Store {
            dir: dir.to_path_buf(),
            entries,
            tags,
            params,
        })
    }

    /// All entries, resolved and unresolved.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Looks up a single entry by identity.
    pub fn entry(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The tag catalogue after the union with discovered tags.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Appends a freshly collected entry.
    pub fn append_entry(&mut self, entry: Entry) {
        debug!(tag = %entry.tag, "Appending new entry");
        self.entries.push(entry);
    }

    /// Bumps the display count of a reviewed entry.
    pub fn record_display(&mut self, id: Uuid) {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.record_display(),
            None => warn!(%id, "record_display for unknown entry"),
        }
    }

    /// Marks an entry answered with the supplied resolution text.
    pub fn resolve(&mut self, id: Uuid, text: String, date: NaiveDate) {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.resolve(text, date),
            None => warn!(%id, "resolve for unknown entry"),
        }
    }

    /// Loads the state table from `states.json`.
    pub fn load_states(&self) -> AppResult<Vec<State>> {
        Ok(read_json(&self.dir.join(STATES_FILE))?)
    }

    /// Loads the devotional panel sets from `screens.json`.
    pub fn load_panel_sets(&self) -> AppResult<Vec<PanelSet>> {
        Ok(read_json(&self.dir.join(SCREENS_FILE))?)
    }

    /// Writes entries, tags and parameters back to disk.
    ///
    /// Called once at orderly shutdown, and best-effort when the run loop
    /// aborts on a fatal error.
    pub fn persist(&self) -> AppResult<()> {
        write_json(&self.dir.join(ENTRIES_FILE), &self.entries)?;
        write_json(&self.dir.join(TAGS_FILE), &self.tags)?;
        write_json(&self.dir.join(PARAMS_FILE), &self.params)?;
        info!("Repository persisted");
        Ok(())
    }

    /// Writes a pretty-printed export of all entries; returns its path.
    pub fn export(&self) -> AppResult<PathBuf> {
        let path = self.dir.join(EXPORT_FILE);
        write_json(&path, &self.entries)?;
        info!(path = %path.display(), "Entries exported");
        Ok(path)
    }
}

fn validate_entries(entries: &[Entry]) -> AppResult<()> {
    for entry in entries {
        if entry.content.trim().is_empty() {
            return Err(AppError::Config(format!(
                "entry {} has empty content",
                entry.id
            )));
        }
        if entry.tag.trim().is_empty() {
            return Err(AppError::Config(format!("entry {} has empty tag", entry.id)));
        }
    }
    Ok(())
}

fn validate_tags(tags: &[Tag]) -> AppResult<()> {
    for tag in tags {
        if tag.weight < 1 {
            return Err(AppError::Config(format!(
                "tag '{}' has weight {}; weights must be >= 1",
                tag.name, tag.weight
            )));
        }
    }
    Ok(())
}

/// The built-in tag catalogue written to a fresh data directory.
pub fn default_tags() -> Vec<Tag> {
    vec![
        Tag::new("Family", 2),
        Tag::new("Health", 2),
        Tag::new("General", 1),
    ]
}
