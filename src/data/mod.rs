//! Typed views over PokeAPI responses
//!
//! Only the fields the commands print are modeled; everything else in the
//! payload is ignored during decoding.

pub mod location;
pub mod pokemon;

pub use location::{LocationArea, LocationAreaPage, PokemonEncounter};
pub use pokemon::{Pokemon, PokemonStat, PokemonType};

use serde::{Deserialize, Serialize};

/// Base URL for the PokeAPI
pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// A name plus the URL of the full resource, as PokeAPI links things
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Builds the URL of the first page of location areas
///
/// `base_url` is expected without a trailing slash; `Session` normalizes it.
pub fn location_areas_url(base_url: &str) -> String {
    format!("{}/location-area/?offset=0&limit=20", base_url)
}

/// Builds the URL of a single location area
pub fn location_area_url(base_url: &str, area: &str) -> String {
    format!("{}/location-area/{}", base_url, area)
}

/// Builds the URL of a single pokemon
pub fn pokemon_url(base_url: &str, name: &str) -> String {
    format!("{}/pokemon/{}", base_url, name)
}
