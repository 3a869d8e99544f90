//! Behaviour-driven coverage for preferred-language resolution.
//!
//! Scenarios pin the lookup order used when a loader starts up: stored
//! preference, then environment locale, then the default language.

use battledata_common::{LanguageSelection, LanguageSet, resolve_language};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

#[derive(Debug, Default)]
struct ResolutionWorld {
    stored: RefCell<Option<String>>,
    environment: RefCell<Option<String>>,
    selection: RefCell<Option<LanguageSelection>>,
}

impl ResolutionWorld {
    fn selection(&self) -> LanguageSelection {
        self.selection
            .borrow()
            .clone()
            .unwrap_or_else(|| panic!("language should have been resolved"))
    }
}

#[fixture]
fn world() -> ResolutionWorld {
    ResolutionWorld::default()
}

#[given("the stored preference {language}")]
fn given_stored(world: &ResolutionWorld, language: String) {
    *world.stored.borrow_mut() = Some(language);
}

#[given("no stored preference")]
fn given_no_stored(world: &ResolutionWorld) {
    *world.stored.borrow_mut() = None;
}

#[given("the environment locale {locale}")]
fn given_environment(world: &ResolutionWorld, locale: String) {
    *world.environment.borrow_mut() = Some(locale);
}

#[given("no environment locale")]
fn given_no_environment(world: &ResolutionWorld) {
    *world.environment.borrow_mut() = None;
}

#[when("the preferred language is resolved")]
fn when_resolved(world: &ResolutionWorld) {
    let stored = world.stored.borrow().clone();
    let environment = world.environment.borrow().clone();
    let selection = resolve_language(
        LanguageSet::builtin(),
        stored.as_deref(),
        environment.as_deref(),
    );
    *world.selection.borrow_mut() = Some(selection);
}

#[then("the resolved language is {expected}")]
fn then_language(world: &ResolutionWorld, expected: String) {
    assert_eq!(world.selection().language(), expected);
}

#[then("the language came from the {source}")]
fn then_source(world: &ResolutionWorld, source: String) {
    assert_eq!(world.selection().source().to_string(), source);
}

#[scenario(path = "tests/features/language_resolution.feature", index = 0)]
fn scenario_stored_preference(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/language_resolution.feature", index = 1)]
fn scenario_unsupported_environment(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/language_resolution.feature", index = 2)]
fn scenario_environment_over_bad_preference(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/language_resolution.feature", index = 3)]
fn scenario_nothing_to_go_on(world: ResolutionWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/language_resolution.feature", index = 4)]
fn scenario_locale_extensions(world: ResolutionWorld) {
    let _ = world;
}
