//! The language whitelist.
//!
//! Language tags are compared verbatim after trimming; the data server lays
//! out its directories using the same lowercase primary subtags.

use once_cell::sync::Lazy;
use thiserror::Error;

/// The language whose files sit at the root of the data tree.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Languages the data server publishes files for out of the box.
pub const AVAILABLE_LANGUAGES: &[&str] = &["en", "es"];

static BUILTIN: Lazy<LanguageSet> = Lazy::new(|| LanguageSet {
    available: AVAILABLE_LANGUAGES.iter().map(|tag| (*tag).to_owned()).collect(),
    default: DEFAULT_LANGUAGE.to_owned(),
});

/// Errors raised when a language whitelist is malformed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LanguageSetError {
    /// The whitelist contains no languages at all.
    #[error("the language list is empty")]
    Empty,

    /// The default language is missing from the whitelist.
    #[error("default language `{default}` is not one of: {available}")]
    DefaultNotAvailable {
        /// The rejected default language.
        default: String,
        /// Comma-separated list of whitelisted languages.
        available: String,
    },
}

/// A validated whitelist of display languages with a designated default.
///
/// # Examples
///
/// ```
/// use battledata_common::LanguageSet;
///
/// let languages = LanguageSet::new(["en", "es", "fr"], "en").expect("valid whitelist");
/// assert!(languages.contains("fr"));
/// assert!(languages.is_default("en"));
/// assert_eq!(languages.coerce("de"), ("en", true));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageSet {
    available: Vec<String>,
    default: String,
}

impl LanguageSet {
    /// Build a whitelist, rejecting empty lists and absent defaults.
    ///
    /// Blank entries are dropped and duplicates collapse onto their first
    /// occurrence so the order callers see matches the order supplied.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageSetError::Empty`] when no usable tag remains, and
    /// [`LanguageSetError::DefaultNotAvailable`] when `default` is not listed.
    pub fn new<I, S>(available: I, default: &str) -> Result<Self, LanguageSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags: Vec<String> = Vec::new();
        for tag in available {
            let trimmed = tag.as_ref().trim();
            if trimmed.is_empty() || tags.iter().any(|known| known == trimmed) {
                continue;
            }
            tags.push(trimmed.to_owned());
        }

        if tags.is_empty() {
            return Err(LanguageSetError::Empty);
        }

        let default = default.trim();
        if !tags.iter().any(|tag| tag == default) {
            return Err(LanguageSetError::DefaultNotAvailable {
                default: default.to_owned(),
                available: tags.join(", "),
            });
        }

        Ok(Self {
            available: tags,
            default: default.to_owned(),
        })
    }

    /// The built-in whitelist: [`AVAILABLE_LANGUAGES`] with [`DEFAULT_LANGUAGE`].
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Languages in whitelist order.
    #[must_use]
    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// The default language.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default
    }

    /// Whether `language` is whitelisted.
    #[must_use]
    pub fn contains(&self, language: &str) -> bool {
        let language = language.trim();
        self.available.iter().any(|tag| tag == language)
    }

    /// Whether `language` is the default language.
    #[must_use]
    pub fn is_default(&self, language: &str) -> bool {
        self.default == language.trim()
    }

    /// Map `language` onto the whitelist.
    ///
    /// Returns the whitelisted tag and `false` when the language is known,
    /// or the default language and `true` when it had to be substituted.
    #[must_use]
    pub fn coerce<'a>(&'a self, language: &str) -> (&'a str, bool) {
        let language = language.trim();
        match self.available.iter().find(|tag| *tag == language) {
            Some(tag) => (tag.as_str(), false),
            None => (self.default.as_str(), true),
        }
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
