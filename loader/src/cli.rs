//! CLI argument definitions for `battledata`.
//!
//! Kept apart from the entrypoint so argument parsing can be tested without
//! running any command.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Fetch localized battle data from the data server.
#[derive(Parser, Debug)]
#[command(name = "battledata")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Load every category in the preferred language:\n",
    "    $ battledata fetch\n\n",
    "  Load Spanish data and save the scripts:\n",
    "    $ battledata fetch --lang es --out data/\n\n",
    "  Remember Spanish for later sessions:\n",
    "    $ battledata language --set es",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file [default: ./battledata.toml].
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output and progress messages.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run one load cycle and report every category.
    Fetch(FetchArgs),

    /// List the supported languages.
    Languages,

    /// Show or change the stored language preference.
    Language(LanguageArgs),
}

/// Arguments for the fetch command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    /// Language to load [default: the preferred language].
    #[arg(short, long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Directory to write the loaded scripts to.
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Data server origin, overriding the configuration file.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Arguments for the language command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct LanguageArgs {
    /// Store this language as the preference.
    #[arg(long, value_name = "LANG")]
    pub set: Option<String>,
}

impl Cli {
    /// Log filter implied by `--quiet` and `-v`.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// The log filter requested on the command line, if any.
    ///
    /// `None` when neither `--quiet` nor `-v` was given.
    #[must_use]
    pub const fn log_override(&self) -> Option<LevelFilter> {
        if self.quiet || self.verbose > 0 {
            Some(self.log_level())
        } else {
            None
        }
    }

    /// Logger configuration for this invocation.
    ///
    /// `--quiet` and `-v` take precedence over `RUST_LOG`; without them
    /// `RUST_LOG` applies, defaulting to warnings only.
    #[must_use]
    pub fn logger(&self) -> Builder {
        let mut builder = match self.log_override() {
            Some(level) => {
                let mut builder = Builder::new();
                builder.filter_level(level);
                builder
            }
            None => Builder::from_env(Env::default().default_filter_or(self.log_level().as_str())),
        };
        builder.format_timestamp(None);
        builder
    }
}
