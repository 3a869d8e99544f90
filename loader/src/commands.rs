//! The `battledata` subcommands.
//!
//! Each command is generic over the loader's collaborators so it can run
//! against the HTTP host in the binary and against scripted hosts in tests.

use std::io::Write;
use std::path::{Path, PathBuf};

use battledata_common::{LanguageSelection, resolve_language};
use log::{info, warn};

use crate::clock::Clock;
use crate::error::{CliError, Result};
use crate::host::ScriptHost;
use crate::loader::{DataLoader, LoaderSettings};
use crate::output::{
    language_list, selection_message, status_table, stored_message, write_line, written_message,
};
use crate::preferences::PreferenceStore;
use crate::report::LoadReport;
use crate::resource::Resource;

/// Run one load cycle and print its status table.
///
/// Loads `language` when given, otherwise the preferred language. With
/// `out`, every loaded script (and the overlay, when present) is written
/// there under its file name.
///
/// # Errors
///
/// Returns [`CliError::Stalled`] when the host stops delivering events,
/// [`CliError::Output`] when a script cannot be written, and
/// [`CliError::Incomplete`] when any category failed to load.
pub fn fetch<H, P, C>(
    loader: &mut DataLoader<H, P, C>,
    language: Option<&str>,
    out: Option<&Path>,
    environment_locale: Option<&str>,
    stdout: &mut dyn Write,
) -> Result<LoadReport>
where
    H: ScriptHost,
    P: PreferenceStore,
    C: Clock,
{
    let language = language.map_or_else(
        || {
            loader
                .resolve_preferred_language(environment_locale)
                .into_language()
        },
        str::to_owned,
    );

    let mut completion = loader.set_language_completion(&language);
    let report = loader
        .run_until_settled(&mut completion)
        .ok_or(CliError::Stalled)?;
    write_line(stdout, status_table(&report));

    if let Some(directory) = out {
        let written = write_resources(&report, directory)?;
        write_line(stdout, "");
        write_line(stdout, written_message(written.len(), directory));
    }

    let failed: Vec<_> = report.failed().collect();
    if failed.is_empty() {
        Ok(report)
    } else {
        Err(CliError::Incomplete { failed })
    }
}

/// Write every loaded script in `report` to `directory`.
///
/// # Errors
///
/// Returns [`CliError::Output`] when the directory or a file cannot be written.
pub fn write_resources(report: &LoadReport, directory: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(directory).map_err(|source| CliError::Output {
        path: directory.to_path_buf(),
        source,
    })?;

    report
        .resources()
        .map(|(_, resource)| resource)
        .chain(report.overlay())
        .map(|resource| write_resource(resource, directory))
        .collect()
}

fn write_resource(resource: &Resource, directory: &Path) -> Result<PathBuf> {
    let file_name = Path::new(resource.url().path())
        .file_name()
        .map_or_else(|| PathBuf::from(resource.url().path()), PathBuf::from);
    let path = directory.join(file_name);
    std::fs::write(&path, resource.body()).map_err(|source| CliError::Output {
        path: path.clone(),
        source,
    })?;
    info!(target: "loader::cli", "wrote {}", path.display());
    Ok(path)
}

/// Print the language whitelist, marking the default and `current`.
pub fn languages(settings: &LoaderSettings, current: &str, stdout: &mut dyn Write) {
    let languages = &settings.languages;
    write_line(
        stdout,
        language_list(languages.available(), languages.default_language(), current),
    );
}

/// Show the preferred language, or store a new one when `set` is given.
///
/// Unsupported languages are replaced by the default before storing.
///
/// # Errors
///
/// Returns [`CliError::Preferences`] when the preference cannot be stored.
pub fn language<P>(
    settings: &LoaderSettings,
    preferences: &mut P,
    set: Option<&str>,
    environment_locale: Option<&str>,
    stdout: &mut dyn Write,
) -> Result<String>
where
    P: PreferenceStore,
{
    let Some(requested) = set else {
        let selection = preferred(settings, preferences, environment_locale);
        write_line(stdout, selection_message(&selection));
        return Ok(selection.into_language());
    };

    let (stored, substituted) = settings.languages.coerce(requested);
    if substituted {
        warn!(
            target: "loader::language",
            "Language '{requested}' is not available. Using {stored} instead.",
        );
    }
    preferences.set(&settings.preference_key, stored)?;
    write_line(stdout, stored_message(requested, stored));
    Ok(stored.to_owned())
}

fn preferred<P: PreferenceStore>(
    settings: &LoaderSettings,
    preferences: &P,
    environment_locale: Option<&str>,
) -> LanguageSelection {
    let stored = preferences.get(&settings.preference_key);
    resolve_language(&settings.languages, stored.as_deref(), environment_locale)
}
