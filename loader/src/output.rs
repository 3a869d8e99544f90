//! Output formatting for the `battledata` CLI.
//!
//! Every formatter returns text; the entrypoint decides where it goes.

use std::io::Write;

use battledata_common::LanguageSelection;

use crate::category::Category;
use crate::report::{CategoryOutcome, LoadReport, Source};

/// Write one line, ignoring failures on a closed stream.
pub fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Per-category status table for a completed cycle.
///
/// # Example
///
/// ```
/// use battledata_loader::output::status_table;
/// use battledata_loader::report::LoadReport;
///
/// let report = LoadReport::default();
/// let table = status_table(&report);
/// assert!(table.contains("text"));
/// assert!(table.contains("pending"));
/// ```
#[must_use]
pub fn status_table(report: &LoadReport) -> String {
    let mut lines = vec![format!("Language: {}", report.language()), String::new()];
    for category in Category::ALL {
        lines.push(format!(
            "  {:<10} {:<14} {}",
            category.name(),
            category.binding(),
            describe(report.outcome(category)),
        ));
    }

    if let Some(overlay) = report.overlay() {
        lines.push(String::new());
        lines.push(format!("Overlay: {}", overlay.url().path()));
    }

    lines.join("\n")
}

fn describe(outcome: Option<&CategoryOutcome>) -> String {
    match outcome {
        Some(CategoryOutcome::Loaded {
            resource,
            source: Source::Primary,
        }) => format!("loaded     {}", resource.url().path()),
        Some(CategoryOutcome::Loaded {
            resource,
            source: Source::Fallback,
        }) => format!("fallback   {}", resource.url().path()),
        Some(CategoryOutcome::Failed { reason }) => format!("failed     {reason}"),
        None => "pending".to_owned(),
    }
}

/// One line per whitelisted language, marking the default and current one.
#[must_use]
pub fn language_list(available: &[String], default: &str, current: &str) -> String {
    available
        .iter()
        .map(|language| {
            let mut marks = Vec::new();
            if language == default {
                marks.push("default");
            }
            if language == current {
                marks.push("current");
            }
            if marks.is_empty() {
                language.clone()
            } else {
                format!("{language} ({})", marks.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describe the resolved preferred language.
#[must_use]
pub fn selection_message(selection: &LanguageSelection) -> String {
    format!("{} (from {})", selection.language(), selection.source())
}

/// Confirmation after storing a language preference.
#[must_use]
pub fn stored_message(requested: &str, stored: &str) -> String {
    if requested == stored {
        format!("Language set to {stored}")
    } else {
        format!("Language '{requested}' is not available; set to {stored}")
    }
}

/// Summary line after writing loaded scripts.
#[must_use]
pub fn written_message(count: usize, directory: &std::path::Path) -> String {
    let plural = if count == 1 { "file" } else { "files" };
    format!("Wrote {count} {plural} to {}", directory.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use battledata_common::{LanguageSet, resolve_language};
    use rstest::{fixture, rstest};

    #[fixture]
    fn languages() -> Vec<String> {
        vec!["en".to_owned(), "es".to_owned()]
    }

    #[rstest]
    fn marks_default_and_current(languages: Vec<String>) {
        assert_eq!(
            language_list(&languages, "en", "es"),
            "en (default)\nes (current)"
        );
    }

    #[rstest]
    fn marks_both_on_one_language(languages: Vec<String>) {
        assert_eq!(
            language_list(&languages, "en", "en"),
            "en (default, current)\nes"
        );
    }

    #[rstest]
    fn empty_report_is_all_pending() {
        let table = status_table(&LoadReport::default());
        assert_eq!(table.matches("pending").count(), Category::COUNT);
        assert!(!table.contains("Overlay"));
    }

    #[rstest]
    fn selection_mentions_source() {
        let selection = resolve_language(LanguageSet::builtin(), Some("es"), None);
        assert_eq!(selection_message(&selection), "es (from stored preference)");
    }

    #[rstest]
    fn unsupported_locale_reports_default() {
        let selection = resolve_language(LanguageSet::builtin(), None, Some("fr_FR.UTF-8"));
        assert_eq!(selection_message(&selection), "en (from default language)");
    }

    #[rstest]
    #[case("es", "es", "Language set to es")]
    #[case("fr", "en", "Language 'fr' is not available; set to en")]
    fn stored_message_notes_substitution(
        #[case] requested: &str,
        #[case] stored: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(stored_message(requested, stored), expected);
    }

    #[rstest]
    fn write_line_appends_newline() {
        let mut buffer = Vec::new();
        write_line(&mut buffer, "en (default)");
        assert_eq!(buffer, b"en (default)\n");
    }

    #[rstest]
    fn written_message_pluralises() {
        let dir = std::path::Path::new("out");
        assert_eq!(written_message(1, dir), "Wrote 1 file to out");
        assert_eq!(written_message(5, dir), "Wrote 5 files to out");
    }
}
