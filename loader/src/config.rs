//! Loader configuration read from `battledata.toml`.
//!
//! Every field is optional; a missing file or an omitted key falls back to
//! the built-in defaults, so a bare checkout talks to the public data server
//! in English and Spanish.

use std::path::{Path, PathBuf};
use std::time::Duration;

use battledata_common::{AVAILABLE_LANGUAGES, DEFAULT_LANGUAGE, LanguageSet, LanguageSetError};
use serde::Deserialize;

use crate::loader::{DEFAULT_EXTENSION, LoaderSettings};
use crate::preferences::LANGUAGE_PREF_KEY;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "battledata.toml";

/// Origin of the public data server.
pub const DEFAULT_BASE_URL: &str = "https://play.pokemonshowdown.com";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// The language whitelist is unusable.
    #[error("invalid language settings: {0}")]
    Languages(#[from] LanguageSetError),

    /// The file extension would produce malformed paths.
    #[error("invalid file extension \"{value}\"; expected a non-empty name without '/', '?' or '#'")]
    InvalidExtension {
        /// The rejected extension.
        value: String,
    },

    /// The base URL is not an HTTP(S) origin.
    #[error("invalid base URL \"{value}\"; expected an http:// or https:// origin")]
    InvalidBaseUrl {
        /// The rejected URL.
        value: String,
    },
}

/// Loader configuration.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Origin the `/data/...` paths are resolved against.
    pub base_url: String,
    /// Whitelisted display languages.
    pub languages: Vec<String>,
    /// Language whose files sit at the root of the data tree.
    pub default_language: String,
    /// File extension of data scripts, without the leading dot.
    pub extension: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Preference key the selected language is stored under.
    pub preference_key: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            languages: AVAILABLE_LANGUAGES.iter().map(|tag| (*tag).to_owned()).collect(),
            default_language: DEFAULT_LANGUAGE.to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            preference_key: LANGUAGE_PREF_KEY.to_owned(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from `path`, or from `battledata.toml` in the
    /// working directory when `path` is `None`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] when the file
    /// exists but is unreadable or malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(|| PathBuf::from(CONFIG_FILENAME), Path::to_path_buf);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&raw, &path)
    }

    /// Parse configuration text. `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use battledata_loader::config::LoaderConfig;
    ///
    /// let config = LoaderConfig::parse("languages = [\"en\", \"fr\"]", Path::new("inline"))
    ///     .expect("valid configuration");
    /// assert_eq!(config.languages, ["en", "fr"]);
    /// assert_eq!(config.default_language, "en");
    /// ```
    pub fn parse(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Validate the configuration and derive loader settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the whitelist, extension, or base URL is invalid.
    pub fn settings(&self) -> Result<LoaderSettings, ConfigError> {
        self.validate_base_url()?;
        let extension = self.extension.trim().trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '?', '#']) {
            return Err(ConfigError::InvalidExtension {
                value: self.extension.clone(),
            });
        }

        Ok(LoaderSettings {
            languages: LanguageSet::new(&self.languages, &self.default_language)?,
            extension: extension.to_owned(),
            preference_key: self.preference_key.clone(),
        })
    }

    /// The per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate_base_url(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        let origin = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        match origin {
            Some(rest) if !rest.is_empty() => Ok(()),
            _ => Err(ConfigError::InvalidBaseUrl {
                value: self.base_url.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn missing_file_yields_defaults() {
        let temp_dir = tempfile::tempdir().expect("create tempdir");
        let config = LoaderConfig::load(Some(&temp_dir.path().join(CONFIG_FILENAME)))
            .expect("defaults");
        assert_eq!(config, LoaderConfig::default());
    }

    #[rstest]
    fn reads_overrides_from_file() {
        let temp_dir = tempfile::tempdir().expect("create tempdir");
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "base_url = \"http://localhost:8000\"\ntimeout_secs = 5\n",
        )
        .expect("write config");

        let config = LoaderConfig::load(Some(&path)).expect("parse config");
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.languages, ["en", "es"]);
    }

    #[rstest]
    fn rejects_unknown_keys() {
        let err = LoaderConfig::parse("retries = 3", Path::new("inline")).expect_err("unknown key");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[rstest]
    fn default_settings_match_builtin_languages() {
        let settings = LoaderConfig::default().settings().expect("valid defaults");
        assert_eq!(settings, LoaderSettings::default());
    }

    #[rstest]
    fn default_language_must_be_whitelisted() {
        let config = LoaderConfig {
            languages: vec!["es".to_owned()],
            ..LoaderConfig::default()
        };
        let err = config.settings().expect_err("default not listed");
        assert!(matches!(
            err,
            ConfigError::Languages(LanguageSetError::DefaultNotAvailable { .. })
        ));
    }

    #[rstest]
    #[case(".js", Some("js"))]
    #[case("json", Some("json"))]
    #[case("", None)]
    #[case("js?x", None)]
    #[case("a/b", None)]
    fn validates_extension(#[case] extension: &str, #[case] expected: Option<&str>) {
        let config = LoaderConfig {
            extension: extension.to_owned(),
            ..LoaderConfig::default()
        };
        match (config.settings(), expected) {
            (Ok(settings), Some(expected)) => assert_eq!(settings.extension, expected),
            (Err(ConfigError::InvalidExtension { .. }), None) => {}
            (other, _) => panic!("unexpected result for {extension:?}: {other:?}"),
        }
    }

    #[rstest]
    #[case("https://play.pokemonshowdown.com", true)]
    #[case("http://localhost:8000", true)]
    #[case("ftp://example.com", false)]
    #[case("https://", false)]
    fn validates_base_url(#[case] base_url: &str, #[case] valid: bool) {
        let config = LoaderConfig {
            base_url: base_url.to_owned(),
            ..LoaderConfig::default()
        };
        assert_eq!(config.settings().is_ok(), valid);
    }
}
