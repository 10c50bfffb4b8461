//! Pokemon responses, used by `catch` and `inspect`

use serde::{Deserialize, Serialize};

use super::NamedResource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    /// Experience gained for defeating this pokemon; drives catch difficulty
    #[serde(default)]
    pub base_experience: Option<u32>,
    /// Height in decimetres
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonType {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}
