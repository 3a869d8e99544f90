//! Display-language whitelist and preferred-language resolution.
//!
//! A [`LanguageSet`] holds the languages the data server publishes files for
//! and the default language whose files live at the root of the data tree.
//! [`resolve_language`] picks the language a session should start in by
//! consulting a stored preference first, then the environment locale, and
//! finally the default.

mod environment;
mod languages;
mod selection;

pub use environment::{environment_locale, primary_subtag};
pub use languages::{AVAILABLE_LANGUAGES, DEFAULT_LANGUAGE, LanguageSet, LanguageSetError};
pub use selection::{LanguageSelection, LanguageSource, normalise_locale, resolve_language};
