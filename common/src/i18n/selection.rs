use std::fmt;

use log::debug;

use super::{LanguageSet, primary_subtag};

/// Source for a resolved language.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LanguageSource {
    /// Language read from the stored preference.
    Preference,
    /// Language derived from the environment locale.
    Environment,
    /// The whitelist's default language.
    Default,
}

impl fmt::Display for LanguageSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Preference => formatter.write_str("stored preference"),
            Self::Environment => formatter.write_str("environment locale"),
            Self::Default => formatter.write_str("default language"),
        }
    }
}

/// Outcome of preferred-language resolution including its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LanguageSelection {
    language: String,
    source: LanguageSource,
    requested: Option<String>,
}

impl LanguageSelection {
    fn new(language: &str, source: LanguageSource, requested: Option<String>) -> Self {
        Self {
            language: language.to_owned(),
            source,
            requested,
        }
    }

    /// Returns the resolved language tag.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns where the language came from.
    #[must_use]
    pub const fn source(&self) -> LanguageSource {
        self.source
    }

    /// Returns the raw value supplied by the winning source, if any.
    #[must_use]
    pub fn requested(&self) -> Option<&str> {
        self.requested.as_deref()
    }

    /// Consumes the selection, yielding the language tag.
    #[must_use]
    pub fn into_language(self) -> String {
        self.language
    }
}

/// Resolve the language a session should start in.
///
/// Candidates are considered in order:
///
/// 1. The stored preference, used verbatim when whitelisted.
/// 2. The environment locale's primary subtag, lowercased, when whitelisted.
/// 3. The whitelist's default language.
///
/// Resolution never fails: malformed locales simply drop out.
///
/// # Examples
///
/// ```
/// use battledata_common::{LanguageSet, LanguageSource, resolve_language};
///
/// let languages = LanguageSet::builtin();
///
/// let stored = resolve_language(languages, Some("es"), Some("en-US"));
/// assert_eq!(stored.language(), "es");
/// assert_eq!(stored.source(), LanguageSource::Preference);
///
/// let fallback = resolve_language(languages, None, Some("fr-FR"));
/// assert_eq!(fallback.language(), "en");
/// assert_eq!(fallback.source(), LanguageSource::Default);
/// ```
#[must_use]
pub fn resolve_language(
    languages: &LanguageSet,
    stored: Option<&str>,
    environment: Option<&str>,
) -> LanguageSelection {
    if let Some(candidate) = normalise_locale(stored) {
        if languages.contains(candidate) {
            return LanguageSelection::new(
                candidate,
                LanguageSource::Preference,
                Some(candidate.to_owned()),
            );
        }
        debug!(
            target: "i18n::selection",
            "ignoring unsupported {} `{candidate}`",
            LanguageSource::Preference,
        );
    }

    if let Some(raw) = normalise_locale(environment) {
        match primary_subtag(raw) {
            Some(subtag) if languages.contains(&subtag) => {
                return LanguageSelection::new(
                    &subtag,
                    LanguageSource::Environment,
                    Some(raw.to_owned()),
                );
            }
            _ => debug!(
                target: "i18n::selection",
                "ignoring unsupported {} `{raw}`",
                LanguageSource::Environment,
            ),
        }
    }

    LanguageSelection::new(languages.default_language(), LanguageSource::Default, None)
}

/// Trim whitespace and discard empty language candidates.
#[must_use]
pub fn normalise_locale(input: Option<&str>) -> Option<&str> {
    input
        .map(str::trim)
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}
