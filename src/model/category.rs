use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Abilities,
    Items,
    Moves,
    Pokemon,
}

impl Category {
    /// Data file name for a generation, e.g. `gen4_moves.json`.
    pub fn data_file(self, generation: &str) -> String {
        let stem = match self {
            Category::Abilities => "abilities",
            Category::Items => "items",
            Category::Moves => "moves",
            Category::Pokemon => "pokemons",
        };
        format!("{generation}_{stem}.json")
    }

    /// Static English → Chinese name dictionary.
    pub fn name_dictionary_file(self) -> &'static str {
        match self {
            Category::Abilities => "ability_translations.json",
            Category::Items => "item_translations.json",
            Category::Moves => "move_translations.json",
            Category::Pokemon => "pokemon_translation.json",
        }
    }

    /// Description cache. Pokemon records carry no descriptions.
    pub fn cache_file(self) -> Option<&'static str> {
        match self {
            Category::Abilities => Some("ability_desc_translations.json"),
            Category::Items => Some("item_desc_translations.json"),
            Category::Moves => Some("move_desc_translations.json"),
            Category::Pokemon => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Abilities => "abilities",
            Category::Items => "items",
            Category::Moves => "moves",
            Category::Pokemon => "pokemon",
        };
        f.write_str(s)
    }
}
