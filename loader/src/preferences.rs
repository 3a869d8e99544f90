//! Preference storage for the selected display language.
//!
//! The loader persists exactly one value, under [`LANGUAGE_PREF_KEY`], so a
//! language chosen in one session is restored in the next. The file-backed
//! store keeps all preferences in a small JSON object at
//! `<config_dir>/preferences.json`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use log::warn;

use crate::dirs::BaseDirs;

/// Key the selected language is stored under.
pub const LANGUAGE_PREF_KEY: &str = "battle-language";

const PREFERENCES_FILENAME: &str = "preferences.json";

/// Errors that prevent preference persistence.
#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    /// The configuration directory could not be resolved.
    #[error("could not determine the battledata configuration directory")]
    MissingConfigDirectory,

    /// Reading the preferences file failed.
    #[error("failed to read preferences file {path}: {source}")]
    Read {
        /// File path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Creating the preferences directory failed.
    #[error("failed to create preferences directory {path}: {source}")]
    CreateDirectory {
        /// Directory path that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing preferences failed.
    #[error("failed to serialize preferences: {source}")]
    Serialize {
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing the preferences file failed.
    #[error("failed to write preferences file {path}: {source}")]
    Write {
        /// File path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A string-valued preference store.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one value.
    #[must_use]
    pub fn with(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_owned(), value.to_owned());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Preferences persisted as JSON on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open the store in the user's configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::MissingConfigDirectory`] when no directory
    /// can be resolved, or a read error from [`FilePreferences::open`].
    pub fn for_dirs(dirs: &dyn BaseDirs) -> Result<Self, PreferenceError> {
        let config_dir = dirs
            .config_dir()
            .ok_or(PreferenceError::MissingConfigDirectory)?;
        Self::open(&config_dir.join(PREFERENCES_FILENAME))
    }

    /// Open the store at `path`.
    ///
    /// A missing file yields an empty store. A malformed file is treated as
    /// empty and is replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`PreferenceError::Read`] when the file exists but cannot be read.
    pub fn open(path: &Path) -> Result<Self, PreferenceError> {
        let values = if path.exists() {
            let content =
                std::fs::read_to_string(path).map_err(|source| PreferenceError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(err) => {
                    warn!(
                        target: "loader::preferences",
                        "ignoring malformed preferences file {}: {err}",
                        path.display(),
                    );
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| {
                PreferenceError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }

        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|source| PreferenceError::Serialize { source })?;
        std::fs::write(&self.path, json).map_err(|source| PreferenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_owned(), value.to_owned());
        self.persist()
    }
}
