//! The fixed set of game-data categories.
//!
//! Each category maps to one script file on the data server. The binding
//! name is the global registry the script populates when executed; the
//! loader only reports it.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// One named kind of game-data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Battle text strings.
    Text,
    /// Move definitions.
    Moves,
    /// Species data.
    Pokedex,
    /// Ability definitions.
    Abilities,
    /// Item definitions.
    Items,
}

/// Error raised when a category name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown data category \"{name}\"; expected one of: text, moves, pokedex, abilities, items")]
pub struct UnknownCategory {
    /// The rejected name.
    pub name: String,
}

impl Category {
    /// Number of categories.
    pub const COUNT: usize = 5;

    /// Every category in load order. `Text` always comes first.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Text,
        Self::Moves,
        Self::Pokedex,
        Self::Abilities,
        Self::Items,
    ];

    /// File stem used to build resource paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use battledata_loader::category::Category;
    ///
    /// assert_eq!(Category::Pokedex.name(), "pokedex");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Moves => "moves",
            Self::Pokedex => "pokedex",
            Self::Abilities => "abilities",
            Self::Items => "items",
        }
    }

    /// Name of the registry the loaded script populates.
    #[must_use]
    pub const fn binding(self) -> &'static str {
        match self {
            Self::Text => "BattleText",
            Self::Moves => "BattleMovedex",
            Self::Pokedex => "BattlePokedex",
            Self::Abilities => "BattleAbilities",
            Self::Items => "BattleItems",
        }
    }

    /// Position in [`Category::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Text => 0,
            Self::Moves => 1,
            Self::Pokedex => 2,
            Self::Abilities => 3,
            Self::Items => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.name() == value)
            .ok_or_else(|| UnknownCategory {
                name: value.to_owned(),
            })
    }
}
