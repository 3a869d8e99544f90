//! The load-cycle state machine.
//!
//! A [`DataLoader`] owns the current language, the per-category load flags,
//! and the queue of waiters. Each load cycle requests every category for the
//! current language, retries a failed category once from the default
//! language, and completes when all categories have settled, loaded or not.
//!
//! Starting a cycle while another is in flight supersedes the older one.
//! Events for the superseded cycle's requests are dropped, its waiters move
//! to the new cycle, and the load flags only ever describe the newest cycle.

use std::collections::{BTreeMap, HashMap};

use battledata_common::{LanguageSelection, LanguageSet, resolve_language};
use log::{debug, error, warn};

use crate::category::Category;
use crate::clock::{Clock, SystemClock, is_overlay_day};
use crate::completion::{Callback, Completion, Waiter};
use crate::host::{FetchError, HostEvent, RequestId, ScriptHost};
use crate::preferences::{LANGUAGE_PREF_KEY, PreferenceStore};
use crate::report::{CategoryOutcome, CycleId, LoadReport, Source};
use crate::resource::{CacheBuster, Resource, ResourceUrl};
use crate::state::LoadState;

/// File extension of data scripts.
pub const DEFAULT_EXTENSION: &str = "js";

/// Static settings for a loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSettings {
    /// Whitelisted languages and the default language.
    pub languages: LanguageSet,
    /// File extension appended to every category stem.
    pub extension: String,
    /// Preference key the selected language is stored under.
    pub preference_key: String,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            languages: LanguageSet::default(),
            extension: DEFAULT_EXTENSION.to_owned(),
            preference_key: LANGUAGE_PREF_KEY.to_owned(),
        }
    }
}

/// Whether a loader is waiting on a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No cycle is in flight.
    Idle,
    /// A cycle is in flight.
    Loading(CycleId),
}

/// What a language change or reload request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTrigger {
    /// The language was already current with text loaded; nothing was requested.
    AlreadyLoaded,
    /// A new cycle was started.
    Started(CycleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Primary,
    Fallback,
    Overlay,
}

#[derive(Debug)]
struct Request {
    cycle: CycleId,
    category: Category,
    attempt: Attempt,
    url: ResourceUrl,
}

#[derive(Debug)]
struct Cycle {
    id: CycleId,
    language: String,
    unsettled: usize,
    outcomes: BTreeMap<Category, CategoryOutcome>,
    overlay: Option<Resource>,
}

impl Cycle {
    fn snapshot(&self) -> LoadReport {
        LoadReport::new(
            Some(self.id),
            &self.language,
            self.outcomes.clone(),
            self.overlay.clone(),
        )
    }
}

/// Loads every data category for the current language.
///
/// The loader never blocks and never spawns threads: requests are handed to
/// the [`ScriptHost`], and the caller drives progress by feeding host events
/// back in through [`DataLoader::pump`], [`DataLoader::run_until_idle`], or
/// [`DataLoader::dispatch`].
pub struct DataLoader<H, P, C = SystemClock> {
    host: H,
    preferences: P,
    clock: C,
    settings: LoaderSettings,
    language: String,
    state: LoadState,
    waiters: Vec<Waiter>,
    cycle: Option<Cycle>,
    requests: HashMap<RequestId, Request>,
    last_report: Option<LoadReport>,
    cache_buster: CacheBuster,
    next_cycle: u64,
    next_request: u64,
}

impl<H, P, C> DataLoader<H, P, C>
where
    H: ScriptHost,
    P: PreferenceStore,
    C: Clock,
{
    /// Create an idle loader set to the default language.
    ///
    /// Nothing is requested until [`DataLoader::set_language`] or
    /// [`DataLoader::reload_data`] is called.
    pub fn new(settings: LoaderSettings, host: H, preferences: P, clock: C) -> Self {
        let language = settings.languages.default_language().to_owned();
        Self {
            host,
            preferences,
            clock,
            settings,
            language,
            state: LoadState::default(),
            waiters: Vec::new(),
            cycle: None,
            requests: HashMap::new(),
            last_report: None,
            cache_buster: CacheBuster::default(),
            next_cycle: 1,
            next_request: 1,
        }
    }

    /// Create a loader and start loading in the preferred language.
    ///
    /// The preferred language comes from the stored preference, then from
    /// `environment_locale`, then the default; it is persisted and the first
    /// cycle is started.
    pub fn start(
        settings: LoaderSettings,
        host: H,
        preferences: P,
        clock: C,
        environment_locale: Option<&str>,
    ) -> Self {
        let mut loader = Self::new(settings, host, preferences, clock);
        let selection = loader.resolve_preferred_language(environment_locale);
        debug!(
            target: "loader::cycle",
            "starting in `{}` from {}",
            selection.language(),
            selection.source(),
        );
        loader.set_language(selection.language(), None);
        loader
    }

    /// Resolve the language a session should start in.
    ///
    /// Reads the stored preference and falls back to `environment_locale`
    /// and then the default language. Has no side effects.
    pub fn resolve_preferred_language(&self, environment_locale: Option<&str>) -> LanguageSelection {
        let stored = self.preferences.get(&self.settings.preference_key);
        resolve_language(
            &self.settings.languages,
            stored.as_deref(),
            environment_locale,
        )
    }

    /// The current language.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// A copy of the language whitelist.
    #[must_use]
    pub fn available_languages(&self) -> Vec<String> {
        self.settings.languages.available().to_vec()
    }

    /// The loader's settings.
    #[must_use]
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// With a category, whether it is loaded; with `None`, whether all are.
    #[must_use]
    pub fn is_loaded(&self, category: Option<Category>) -> bool {
        match category {
            Some(category) => self.state.is_loaded(category),
            None => self.state.all_loaded(),
        }
    }

    /// Whether a cycle is in flight.
    #[must_use]
    pub fn phase(&self) -> Phase {
        match &self.cycle {
            Some(cycle) => Phase::Loading(cycle.id),
            None => Phase::Idle,
        }
    }

    /// The report of the most recently completed cycle.
    #[must_use]
    pub fn report(&self) -> Option<&LoadReport> {
        self.last_report.as_ref()
    }

    /// The script host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The script host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The preference store.
    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    /// Switch to `language` and load its data.
    ///
    /// Unknown languages are replaced by the default language. The
    /// (possibly substituted) language is persisted either way. When it is
    /// already current and text is loaded, `callback` runs immediately and
    /// nothing is requested; otherwise the callback is queued and a new
    /// cycle starts.
    pub fn set_language(&mut self, language: &str, callback: Option<Callback>) -> LoadTrigger {
        self.change_language(language, callback.map(Waiter::Callback))
    }

    /// Like [`DataLoader::set_language`], returning a [`Completion`] handle.
    pub fn set_language_completion(&mut self, language: &str) -> Completion {
        let (waiter, completion) = Waiter::channel();
        self.change_language(language, Some(waiter));
        completion
    }

    /// Start a fresh cycle in the current language.
    ///
    /// Always reloads, even when everything is already loaded.
    pub fn reload_data(&mut self, callback: Option<Callback>) -> CycleId {
        if let Some(callback) = callback {
            self.waiters.push(Waiter::Callback(callback));
        }
        self.begin_cycle()
    }

    /// Like [`DataLoader::reload_data`], returning a [`Completion`] handle.
    pub fn reload_data_completion(&mut self) -> Completion {
        let (waiter, completion) = Waiter::channel();
        self.waiters.push(waiter);
        self.begin_cycle();
        completion
    }

    /// Deliver one event from the host. Returns `false` when the host had none.
    pub fn pump(&mut self) -> bool {
        match self.host.next_event() {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Deliver host events until the host has none left.
    pub fn run_until_idle(&mut self) {
        while self.pump() {}
    }

    /// Deliver host events until `completion` resolves or the host runs dry.
    ///
    /// Returns `None` when the host stopped producing events before the
    /// cycle completed (a request that never settles).
    pub fn run_until_settled(&mut self, completion: &mut Completion) -> Option<LoadReport> {
        while !completion.is_settled() {
            if !self.pump() {
                break;
            }
        }
        completion.poll().cloned()
    }

    /// Apply a settled request.
    ///
    /// Events for unknown requests, including those of superseded cycles,
    /// are ignored.
    pub fn dispatch(&mut self, event: HostEvent) {
        let Some(request) = self.requests.remove(&event.request) else {
            debug!(
                target: "loader::cycle",
                "ignoring event for stale request {}",
                event.request,
            );
            return;
        };

        let current = self.cycle.as_ref().map(|cycle| cycle.id);
        if current != Some(request.cycle) {
            debug!(
                target: "loader::cycle",
                "ignoring event for superseded {}",
                request.cycle,
            );
            return;
        }

        match (request.attempt, event.outcome) {
            (Attempt::Primary, Ok(body)) => {
                self.record_loaded(request, body, Source::Primary);
            }
            (Attempt::Fallback, Ok(body)) => {
                self.record_loaded(request, body, Source::Fallback);
            }
            (Attempt::Primary, Err(err)) => self.primary_failed(request.category, &err),
            (Attempt::Fallback, Err(err)) => {
                error!(
                    target: "loader::cycle",
                    "Failed to load default {} file: {err}",
                    request.category,
                );
                self.record_failed(request.category, &err);
                self.finish_data_file(request.category);
            }
            (Attempt::Overlay, Ok(body)) => {
                if let Some(cycle) = self.cycle.as_mut() {
                    cycle.overlay = Some(Resource::new(request.url, body));
                }
                self.settle(request.category);
            }
            (Attempt::Overlay, Err(err)) => {
                debug!(target: "loader::cycle", "text overlay unavailable: {err}");
                self.settle(request.category);
            }
        }
    }

    fn change_language(&mut self, language: &str, waiter: Option<Waiter>) -> LoadTrigger {
        let (resolved, substituted) = self.settings.languages.coerce(language);
        let resolved = resolved.to_owned();
        if substituted {
            warn!(
                target: "loader::language",
                "Language '{language}' is not available. Using {resolved} instead.",
            );
        }

        if let Err(err) = self
            .preferences
            .set(&self.settings.preference_key, &resolved)
        {
            warn!(target: "loader::language", "could not persist language preference: {err}");
        }

        if self.language == resolved && self.state.is_loaded(Category::Text) {
            if let Some(waiter) = waiter {
                waiter.resolve(&self.current_snapshot());
            }
            return LoadTrigger::AlreadyLoaded;
        }

        self.language = resolved;
        if let Some(waiter) = waiter {
            self.waiters.push(waiter);
        }
        LoadTrigger::Started(self.begin_cycle())
    }

    fn current_snapshot(&self) -> LoadReport {
        match (&self.cycle, &self.last_report) {
            (Some(cycle), _) => cycle.snapshot(),
            (None, Some(report)) => report.clone(),
            (None, None) => LoadReport::new(None, &self.language, BTreeMap::new(), None),
        }
    }

    fn begin_cycle(&mut self) -> CycleId {
        let id = CycleId::new(self.next_cycle);
        self.next_cycle += 1;

        if let Some(previous) = self.cycle.take() {
            debug!(target: "loader::cycle", "{} supersedes {}", id, previous.id);
        }
        self.requests.clear();
        self.state.reset();
        self.cycle = Some(Cycle {
            id,
            language: self.language.clone(),
            unsettled: Category::COUNT,
            outcomes: BTreeMap::new(),
            overlay: None,
        });
        debug!(target: "loader::cycle", "{id} loading `{}`", self.language);

        for category in Category::ALL {
            self.request(id, category, Attempt::Primary);
        }
        id
    }

    fn request(&mut self, cycle: CycleId, category: Category, attempt: Attempt) {
        let token = self.cache_buster.next_token(self.clock.now_millis());
        let extension = self.settings.extension.as_str();
        let url = match attempt {
            Attempt::Primary if !self.settings.languages.is_default(&self.language) => {
                ResourceUrl::for_category(category, Some(&self.language), extension, token)
            }
            Attempt::Primary | Attempt::Fallback => {
                ResourceUrl::for_category(category, None, extension, token)
            }
            Attempt::Overlay => ResourceUrl::overlay(extension, token),
        };

        let id = RequestId::new(self.next_request);
        self.next_request += 1;
        debug!(target: "loader::cycle", "{cycle} requests {id} {url}");
        self.host.inject(id, &url);
        self.requests.insert(
            id,
            Request {
                cycle,
                category,
                attempt,
                url,
            },
        );
    }

    fn record_loaded(&mut self, request: Request, body: String, source: Source) {
        self.state.mark_loaded(request.category);
        if let Some(cycle) = self.cycle.as_mut() {
            cycle.outcomes.insert(
                request.category,
                CategoryOutcome::Loaded {
                    resource: Resource::new(request.url, body),
                    source,
                },
            );
        }
        self.finish_data_file(request.category);
    }

    fn record_failed(&mut self, category: Category, err: &FetchError) {
        if let Some(cycle) = self.cycle.as_mut() {
            cycle.outcomes.insert(
                category,
                CategoryOutcome::Failed {
                    reason: err.to_string(),
                },
            );
        }
    }

    fn primary_failed(&mut self, category: Category, err: &FetchError) {
        let Some(cycle) = self.cycle.as_ref() else {
            return;
        };
        let (id, language) = (cycle.id, cycle.language.clone());
        error!(
            target: "loader::cycle",
            "Failed to load {category} file for '{language}': {err}",
        );

        if self.settings.languages.is_default(&language) {
            self.record_failed(category, err);
            self.finish_data_file(category);
        } else {
            self.request(id, category, Attempt::Fallback);
        }
    }

    /// The category's data file has settled; text may still owe an overlay.
    fn finish_data_file(&mut self, category: Category) {
        if category == Category::Text && is_overlay_day(self.clock.today()) {
            if let Some(id) = self.cycle.as_ref().map(|cycle| cycle.id) {
                self.request(id, category, Attempt::Overlay);
                return;
            }
        }
        self.settle(category);
    }

    fn settle(&mut self, category: Category) {
        let Some(cycle) = self.cycle.as_mut() else {
            return;
        };
        cycle.unsettled = cycle.unsettled.saturating_sub(1);
        debug!(
            target: "loader::cycle",
            "{} settled {category}; {} outstanding",
            cycle.id,
            cycle.unsettled,
        );
        if cycle.unsettled == 0 {
            self.complete_cycle();
        }
    }

    fn complete_cycle(&mut self) {
        let Some(cycle) = self.cycle.take() else {
            return;
        };
        let report = LoadReport::new(
            Some(cycle.id),
            &cycle.language,
            cycle.outcomes,
            cycle.overlay,
        );
        let loaded: Vec<&str> = self.state.loaded().map(Category::name).collect();
        debug!(
            target: "loader::cycle",
            "{} complete; loaded [{}]; {} waiter(s)",
            cycle.id,
            loaded.join(", "),
            self.waiters.len(),
        );

        self.last_report = Some(report.clone());
        for waiter in std::mem::take(&mut self.waiters) {
            waiter.resolve(&report);
        }
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
