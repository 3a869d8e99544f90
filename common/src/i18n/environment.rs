//! Reading the process locale.
//!
//! POSIX locales look like `es_ES.UTF-8@euro`; browsers and most other hosts
//! hand out BCP 47 tags such as `fr-FR`. Both reduce to a primary language
//! subtag here. Only that subtag has to be well formed; regions, scripts,
//! extensions, and private-use tails are ignored.

use std::str::FromStr;

use unic_langid::subtags::Language;

/// Environment variables consulted for the process locale, highest priority first.
const LOCALE_VARIABLES: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

/// Return the first non-empty locale from `LC_ALL`, `LC_MESSAGES`, or `LANG`.
#[must_use]
pub fn environment_locale() -> Option<String> {
    LOCALE_VARIABLES.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
    })
}

/// Extract the lowercased primary language subtag from a locale string.
///
/// Codeset and modifier suffixes (`.UTF-8`, `@euro`) are ignored. Returns
/// `None` for the `C`/`POSIX` locales and when the leading subtag is not a
/// valid language subtag.
///
/// # Examples
///
/// ```
/// use battledata_common::primary_subtag;
///
/// assert_eq!(primary_subtag("fr-FR").as_deref(), Some("fr"));
/// assert_eq!(primary_subtag("es_ES.UTF-8").as_deref(), Some("es"));
/// assert_eq!(primary_subtag("es-ES-u-nu-latn").as_deref(), Some("es"));
/// assert_eq!(primary_subtag("C"), None);
/// ```
#[must_use]
pub fn primary_subtag(raw: &str) -> Option<String> {
    let tag = raw
        .split(['.', '@'])
        .next()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())?;

    if tag.eq_ignore_ascii_case("C") || tag.eq_ignore_ascii_case("POSIX") {
        return None;
    }

    let subtag = tag.split(['-', '_']).next().filter(|subtag| !subtag.is_empty())?;
    let language = Language::from_str(subtag).ok()?;
    let language = language.as_str().to_ascii_lowercase();
    if language == "und" {
        return None;
    }
    Some(language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("fr-FR", Some("fr"))]
    #[case("EN-us", Some("en"))]
    #[case("es", Some("es"))]
    #[case("es_ES.UTF-8", Some("es"))]
    #[case("de_DE@euro", Some("de"))]
    #[case("es-419", Some("es"))]
    #[case("es-ES-u-nu-latn", Some("es"))]
    #[case("es-ES-x-custom", Some("es"))]
    #[case("es_ES_garbage!", Some("es"))]
    #[case("und-ES", None)]
    #[case("-ES", None)]
    #[case("C", None)]
    #[case("POSIX", None)]
    #[case("", None)]
    #[case("not a locale", None)]
    fn extracts_primary_subtag(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(primary_subtag(raw).as_deref(), expected);
    }

    #[rstest]
    fn environment_locale_prefers_lc_all() {
        temp_env::with_vars(
            [
                ("LC_ALL", Some("es_ES.UTF-8")),
                ("LC_MESSAGES", Some("fr_FR.UTF-8")),
                ("LANG", Some("en_GB.UTF-8")),
            ],
            || assert_eq!(environment_locale().as_deref(), Some("es_ES.UTF-8")),
        );
    }

    #[rstest]
    fn environment_locale_skips_blank_values() {
        temp_env::with_vars(
            [
                ("LC_ALL", Some("")),
                ("LC_MESSAGES", None),
                ("LANG", Some("fr_FR.UTF-8")),
            ],
            || assert_eq!(environment_locale().as_deref(), Some("fr_FR.UTF-8")),
        );
    }

    #[rstest]
    fn environment_locale_is_none_when_unset() {
        temp_env::with_vars_unset(["LC_ALL", "LC_MESSAGES", "LANG"], || {
            assert_eq!(environment_locale(), None);
        });
    }
}
