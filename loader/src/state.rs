//! Per-category load flags.

use crate::category::Category;

/// Which categories the current load cycle has delivered.
///
/// All flags start false and are cleared at the start of every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadState {
    flags: [bool; Category::COUNT],
}

impl LoadState {
    /// Clear every flag.
    pub fn reset(&mut self) {
        self.flags = [false; Category::COUNT];
    }

    /// Mark `category` as loaded.
    pub fn mark_loaded(&mut self, category: Category) {
        if let Some(flag) = self.flags.get_mut(category.index()) {
            *flag = true;
        }
    }

    /// Whether `category` is loaded.
    #[must_use]
    pub fn is_loaded(&self, category: Category) -> bool {
        self.flags.get(category.index()).copied().unwrap_or(false)
    }

    /// Whether every category is loaded.
    #[must_use]
    pub fn all_loaded(&self) -> bool {
        self.flags.iter().all(|flag| *flag)
    }

    /// Categories currently marked loaded, in load order.
    pub fn loaded(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(|category| self.is_loaded(*category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_nothing_loaded() {
        let state = LoadState::default();
        assert!(Category::ALL.iter().all(|category| !state.is_loaded(*category)));
        assert!(!state.all_loaded());
    }

    #[test]
    fn all_loaded_requires_every_flag() {
        let mut state = LoadState::default();
        for category in Category::ALL {
            assert!(!state.all_loaded());
            state.mark_loaded(category);
        }
        assert!(state.all_loaded());
    }

    #[test]
    fn reset_clears_flags() {
        let mut state = LoadState::default();
        state.mark_loaded(Category::Moves);
        state.mark_loaded(Category::Items);
        assert_eq!(
            state.loaded().collect::<Vec<_>>(),
            [Category::Moves, Category::Items]
        );

        state.reset();
        assert_eq!(state.loaded().count(), 0);
    }
}
