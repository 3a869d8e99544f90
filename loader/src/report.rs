//! The output of a load cycle.

use std::collections::BTreeMap;
use std::fmt;

use crate::category::Category;
use crate::resource::Resource;

/// Identifies one load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CycleId(u64);

impl CycleId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw cycle number. The first cycle is 1.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle {}", self.0)
    }
}

/// Which request delivered a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The file for the cycle's language.
    Primary,
    /// The default-language file, after the primary request errored.
    Fallback,
}

/// How a category settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    /// The category's script loaded.
    Loaded {
        /// The loaded script.
        resource: Resource,
        /// Whether the primary or the fallback request delivered it.
        source: Source,
    },
    /// Every permitted request errored.
    Failed {
        /// The last error reported by the host.
        reason: String,
    },
}

impl CategoryOutcome {
    /// The loaded resource, if any.
    #[must_use]
    pub fn resource(&self) -> Option<&Resource> {
        match self {
            Self::Loaded { resource, .. } => Some(resource),
            Self::Failed { .. } => None,
        }
    }
}

/// Everything one load cycle produced.
///
/// A report is handed to every waiter when its cycle completes. Categories
/// that have not settled yet (only possible for snapshots taken mid-cycle)
/// have no outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    cycle: Option<CycleId>,
    language: String,
    outcomes: BTreeMap<Category, CategoryOutcome>,
    overlay: Option<Resource>,
}

impl LoadReport {
    pub(crate) fn new(
        cycle: Option<CycleId>,
        language: &str,
        outcomes: BTreeMap<Category, CategoryOutcome>,
        overlay: Option<Resource>,
    ) -> Self {
        Self {
            cycle,
            language: language.to_owned(),
            outcomes,
            overlay,
        }
    }

    /// The cycle that produced this report, or `None` before any cycle ran.
    #[must_use]
    pub const fn cycle(&self) -> Option<CycleId> {
        self.cycle
    }

    /// The language the cycle loaded.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// How `category` settled, if it has.
    #[must_use]
    pub fn outcome(&self, category: Category) -> Option<&CategoryOutcome> {
        self.outcomes.get(&category)
    }

    /// Whether `category` loaded.
    #[must_use]
    pub fn is_loaded(&self, category: Category) -> bool {
        matches!(
            self.outcomes.get(&category),
            Some(CategoryOutcome::Loaded { .. })
        )
    }

    /// Whether every category loaded.
    #[must_use]
    pub fn all_loaded(&self) -> bool {
        Category::ALL
            .into_iter()
            .all(|category| self.is_loaded(category))
    }

    /// Loaded resources in load order.
    pub fn resources(&self) -> impl Iterator<Item = (Category, &Resource)> {
        self.outcomes
            .iter()
            .filter_map(|(category, outcome)| outcome.resource().map(|resource| (*category, resource)))
    }

    /// Categories that settled without loading.
    pub fn failed(&self) -> impl Iterator<Item = Category> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, CategoryOutcome::Failed { .. }))
            .map(|(category, _)| *category)
    }

    /// The seasonal text overlay, when it was requested and loaded.
    #[must_use]
    pub fn overlay(&self) -> Option<&Resource> {
        self.overlay.as_ref()
    }
}
