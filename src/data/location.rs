//! Location area responses
//!
//! Covers the paginated `location-area/` listing used by `map`/`mapb` and the
//! single-area payload used by `explore`.

use serde::{Deserialize, Serialize};

use super::NamedResource;

/// One page of the location area listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas
    #[serde(default)]
    pub count: u32,
    /// URL of the next page, if any
    pub next: Option<String>,
    /// URL of the previous page, if any
    pub previous: Option<String>,
    /// Areas on this page
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// A single location area and the pokemon that can be encountered there
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationArea {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

impl LocationArea {
    /// Names of the pokemon found in this area, in response order
    pub fn pokemon_names(&self) -> impl Iterator<Item = &str> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| encounter.pokemon.name.as_str())
    }
}
