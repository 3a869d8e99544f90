//! Localized battle-data loader.
//!
//! This crate loads the game-data scripts (text, moves, pokedex, abilities,
//! items) for the selected display language, falls back to the default
//! language for any file that is unavailable, and reports when a load cycle
//! has completed. It is used by the `battledata` CLI binary and can be
//! embedded with any [`host::ScriptHost`].
//!
//! # Modules
//!
//! - [`category`] - The fixed set of data categories
//! - [`cli`] - Command-line argument definitions
//! - [`clock`] - Calendar and wall-clock seam
//! - [`commands`] - The `battledata` subcommands
//! - [`completion`] - Callbacks and completion handles for load cycles
//! - [`config`] - `battledata.toml` configuration
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - CLI error types and exit codes
//! - [`host`] - The script host seam
//! - [`http`] - HTTP-backed script host
//! - [`loader`] - The load-cycle state machine
//! - [`output`] - Output formatting for the CLI
//! - [`preferences`] - Language preference storage
//! - [`report`] - The output of a load cycle
//! - [`resource`] - Resource paths, cache-busting tokens, and payloads
//! - [`state`] - Per-category load flags

pub mod category;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod completion;
pub mod config;
pub mod dirs;
pub mod error;
pub mod host;
pub mod http;
pub mod loader;
pub mod output;
pub mod preferences;
pub mod report;
pub mod resource;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use category::Category;
pub use completion::{Callback, Completion};
pub use loader::{DataLoader, LoadTrigger, LoaderSettings, Phase};
pub use report::{CategoryOutcome, CycleId, LoadReport, Source};
