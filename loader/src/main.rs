//! `battledata` CLI entrypoint.
//!
//! Loads localized battle data from the configured data server and manages
//! the stored language preference.

use std::io::Write;

use battledata_common::environment_locale;
use battledata_loader::cli::{Cli, Command};
use battledata_loader::clock::SystemClock;
use battledata_loader::commands;
use battledata_loader::config::LoaderConfig;
use battledata_loader::dirs::SystemBaseDirs;
use battledata_loader::error::Result;
use battledata_loader::http::HttpHost;
use battledata_loader::loader::DataLoader;
use battledata_loader::output::write_line;
use battledata_loader::preferences::{FilePreferences, PreferenceStore};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    cli.logger().init();

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    if let Err(err) = run(&cli, &mut stdout) {
        if !cli.quiet {
            write_line(&mut stderr, format!("error: {err}"));
        }
        std::process::exit(err.exit_code());
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let config = LoaderConfig::load(cli.config.as_deref())?;
    let settings = config.settings()?;
    let locale = environment_locale();
    let preferences = FilePreferences::for_dirs(&SystemBaseDirs::new())?;

    match &cli.command {
        Command::Fetch(args) => {
            let base_url = args.base_url.as_deref().unwrap_or(&config.base_url);
            let host = HttpHost::new(base_url, config.timeout());
            let mut loader = DataLoader::new(settings, host, preferences, SystemClock);
            commands::fetch(
                &mut loader,
                args.lang.as_deref(),
                args.out.as_deref(),
                locale.as_deref(),
                stdout,
            )
            .map(drop)
        }
        Command::Languages => {
            let stored = preferences.get(&settings.preference_key);
            let current = battledata_common::resolve_language(
                &settings.languages,
                stored.as_deref(),
                locale.as_deref(),
            );
            commands::languages(&settings, current.language(), stdout);
            Ok(())
        }
        Command::Language(args) => {
            let mut preferences = preferences;
            commands::language(
                &settings,
                &mut preferences,
                args.set.as_deref(),
                locale.as_deref(),
                stdout,
            )
            .map(drop)
        }
    }
}
