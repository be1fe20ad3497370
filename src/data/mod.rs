//! PokeAPI data models and clients
//!
//! `fetcher` resolves URLs to raw bodies through the response cache;
//! `pokeapi` decodes those bodies into the records defined here.

pub mod fetcher;
pub mod pokeapi;

pub use fetcher::{Client, HttpTransport, NetworkError, Transport};
pub use pokeapi::{ApiError, PokeApiClient, DEFAULT_BASE_URL};

use serde::{Deserialize, Serialize};

/// A name plus the URL of the full resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the location-area listing
///
/// `next` and `previous` are absolute URLs, `None` at either end of the list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas across all pages
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

/// A single location area and the pokemon that can be encountered there
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LocationArea {
    pub name: String,
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PokemonEncounter {
    pub pokemon: NamedResource,
}

/// A pokemon record as stored in the pokedex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    /// Experience gained for defeating this pokemon; absent for some forms
    #[serde(default)]
    pub base_experience: Option<u32>,
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_area_page_deserializes_null_links() {
        let json = r#"{
            "count": 1089,
            "next": "https://pokeapi.co/api/v2/location-area?offset=20&limit=20",
            "previous": null,
            "results": [
                {"name": "canalave-city-area", "url": "https://pokeapi.co/api/v2/location-area/1/"}
            ]
        }"#;

        let page: LocationAreaPage = serde_json::from_str(json).expect("Page should parse");

        assert_eq!(page.count, 1089);
        assert!(page.previous.is_none());
        assert_eq!(
            page.next.as_deref(),
            Some("https://pokeapi.co/api/v2/location-area?offset=20&limit=20")
        );
        assert_eq!(page.results[0].name, "canalave-city-area");
    }

    #[test]
    fn test_location_area_ignores_unknown_fields() {
        let json = r#"{
            "id": 1,
            "name": "canalave-city-area",
            "game_index": 1,
            "pokemon_encounters": [
                {"pokemon": {"name": "tentacool", "url": "u"}, "version_details": []}
            ]
        }"#;

        let area: LocationArea = serde_json::from_str(json).expect("Area should parse");

        assert_eq!(area.name, "canalave-city-area");
        assert_eq!(area.pokemon_encounters.len(), 1);
        assert_eq!(area.pokemon_encounters[0].pokemon.name, "tentacool");
    }

    #[test]
    fn test_pokemon_type_uses_type_key() {
        let json = r#"{
            "name": "pidgey",
            "height": 3,
            "weight": 18,
            "base_experience": 50,
            "stats": [{"base_stat": 40, "effort": 0, "stat": {"name": "hp", "url": "u"}}],
            "types": [
                {"slot": 1, "type": {"name": "normal", "url": "u"}},
                {"slot": 2, "type": {"name": "flying", "url": "u"}}
            ]
        }"#;

        let pokemon: Pokemon = serde_json::from_str(json).expect("Pokemon should parse");

        assert_eq!(pokemon.base_experience, Some(50));
        assert_eq!(pokemon.stats[0].stat.name, "hp");
        assert_eq!(pokemon.stats[0].base_stat, 40);
        assert_eq!(pokemon.types[1].kind.name, "flying");

        // Stored form keeps the wire key so saved pokedex files reload
        let saved = serde_json::to_string(&pokemon).expect("Pokemon should serialize");
        assert!(saved.contains("\"type\""));
    }
}
