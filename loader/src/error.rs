//! Error types for the `battledata` CLI.
//!
//! The loader itself never fails a cycle; these errors cover the layers
//! around it: configuration, preference persistence, and writing fetched
//! files to disk.

use std::path::PathBuf;

use thiserror::Error;

use crate::category::Category;
use crate::config::ConfigError;
use crate::preferences::PreferenceError;

/// Errors surfaced by the `battledata` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// The configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The language preference could not be read or stored.
    #[error(transparent)]
    Preferences(#[from] PreferenceError),

    /// A fetched file could not be written to the output directory.
    #[error("failed to write {path}: {source}")]
    Output {
        /// File or directory that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The host stopped delivering events before the cycle completed.
    #[error("load cycle did not complete; the data server stopped responding")]
    Stalled,

    /// The cycle completed but some categories did not load.
    #[error("failed to load: {}", join_categories(.failed))]
    Incomplete {
        /// Categories that settled without loading.
        failed: Vec<Category>,
    },
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Load failures exit with 1; configuration and environment problems
    /// exit with 2.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Incomplete { .. } | Self::Stalled => 1,
            Self::Config(_) | Self::Preferences(_) | Self::Output { .. } => 2,
        }
    }
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|category| category.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
