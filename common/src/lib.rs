//! Shared language handling for the battledata workspace.
//!
//! The loader and its command-line front end both need to agree on which
//! display languages exist, which one is the default, and how a preferred
//! language is chosen from a stored preference or the process locale. That
//! logic lives here so it can be tested without any network collaborators.

pub mod i18n;

pub use i18n::{
    AVAILABLE_LANGUAGES, DEFAULT_LANGUAGE, LanguageSelection, LanguageSet, LanguageSetError,
    LanguageSource, environment_locale, normalise_locale, primary_subtag, resolve_language,
};
