//! The user's collection of caught pokemon
//!
//! Persisted as a pretty-printed JSON object keyed by the name the pokemon was
//! caught under (what the user typed, e.g. `pikachu` or `25`), stored in
//! an XDG-compliant data directory (`~/.local/share/pokedex/` on Linux) unless
//! a path is given on the command line.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::data::Pokemon;

/// File name used inside the data directory
const SAVE_FILE_NAME: &str = "pokedex.json";

/// Errors that can occur when loading or saving the pokedex
#[derive(Debug, Error)]
pub enum PokedexError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid pokedex file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not determine a data directory; pass --save-file")]
    NoDataDir,
}

/// A caught pokemon and when it was caught
///
/// `caught_at` is absent in files holding bare pokemon records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaughtPokemon {
    #[serde(flatten)]
    pub pokemon: Pokemon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caught_at: Option<DateTime<Utc>>,
}

/// Caught pokemon, ordered by the name they were caught under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pokedex {
    entries: BTreeMap<String, CaughtPokemon>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default save location in the platform data directory
    pub fn default_path() -> Result<PathBuf, PokedexError> {
        let project_dirs = ProjectDirs::from("", "", "pokedex").ok_or(PokedexError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(SAVE_FILE_NAME))
    }

    /// Loads a pokedex from `path`
    ///
    /// A missing file yields an empty pokedex; any other read or parse failure
    /// is returned as an error.
    pub fn load(path: &Path) -> Result<Self, PokedexError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No saved pokedex, starting empty");
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(PokedexError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| PokedexError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the pokedex to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), PokedexError> {
        let io_err = |source| PokedexError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|source| PokedexError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;

        debug!(path = %path.display(), count = self.len(), "Saved pokedex");
        Ok(())
    }

    /// Adds a pokemon under `key`, replacing any earlier catch with the same key
    pub fn add(&mut self, key: &str, pokemon: Pokemon) {
        let entry = CaughtPokemon {
            pokemon,
            caught_at: Some(Utc::now()),
        };
        self.entries.insert(key.to_string(), entry);
    }

    /// Looks up a catch by its key, then by the pokemon's API name
    pub fn get(&self, name: &str) -> Option<&CaughtPokemon> {
        self.entries
            .get(name)
            .or_else(|| self.entries.values().find(|c| c.pokemon.name == name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Catches in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CaughtPokemon)> {
        self.entries.iter().map(|(key, caught)| (key.as_str(), caught))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{NamedResource, PokemonStat, PokemonType};
    use tempfile::TempDir;

    fn pidgey() -> Pokemon {
        Pokemon {
            name: "pidgey".to_string(),
            height: 3,
            weight: 18,
            base_experience: Some(50),
            stats: vec![PokemonStat {
                base_stat: 40,
                stat: NamedResource {
                    name: "hp".to_string(),
                    url: "https://pokeapi.co/api/v2/stat/1/".to_string(),
                },
            }],
            types: vec![PokemonType {
                slot: 1,
                kind: NamedResource {
                    name: "normal".to_string(),
                    url: "https://pokeapi.co/api/v2/type/1/".to_string(),
                },
            }],
        }
    }

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let pokedex = Pokedex::load(&temp_dir.path().join("absent.json")).expect("Load should succeed");
        assert!(pokedex.is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("pokedex.json");

        let mut pokedex = Pokedex::new();
        pokedex.add("pidgey", pidgey());
        pokedex.save(&path).expect("Save should succeed");

        let loaded = Pokedex::load(&path).expect("Load should succeed");
        assert_eq!(loaded, pokedex);
        assert_eq!(loaded.get("pidgey").unwrap().pokemon.types[0].kind.name, "normal");
    }

    #[test]
    fn test_saved_file_is_keyed_by_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("pokedex.json");

        let mut pokedex = Pokedex::new();
        pokedex.add("pidgey", pidgey());
        pokedex.save(&path).expect("Save should succeed");

        let content = fs::read_to_string(&path).expect("Should read file");
        let value: serde_json::Value = serde_json::from_str(&content).expect("Should be JSON");
        assert_eq!(value["pidgey"]["height"], 3);
        assert!(value["pidgey"]["caught_at"].is_string());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("pokedex.json");
        fs::write(&path, "{not json").expect("Should write file");

        let result = Pokedex::load(&path);
        assert!(matches!(result, Err(PokedexError::Json { .. })));
    }

    #[test]
    fn test_add_same_name_replaces() {
        let mut pokedex = Pokedex::new();
        pokedex.add("pidgey", pidgey());
        let mut heavier = pidgey();
        heavier.weight = 20;
        pokedex.add("pidgey", heavier);

        assert_eq!(pokedex.len(), 1);
        assert_eq!(pokedex.get("pidgey").unwrap().pokemon.weight, 20);
    }

    #[test]
    fn test_iter_is_sorted_by_name() {
        let mut pokedex = Pokedex::new();
        let mut zubat = pidgey();
        zubat.name = "zubat".to_string();
        pokedex.add("zubat", zubat);
        pokedex.add("pidgey", pidgey());

        let names: Vec<_> = pokedex.iter().map(|(key, _)| key).collect();
        assert_eq!(names, vec!["pidgey", "zubat"]);
    }

    #[test]
    fn test_load_bare_pokemon_records_without_timestamp() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("pokedex.json");
        fs::write(
            &path,
            r#"{"pidgey": {"name":"pidgey","height":3,"weight":18,"base_experience":50,"stats":[],"types":[]}}"#,
        )
        .expect("Should write file");

        let pokedex = Pokedex::load(&path).expect("Bare records should load");
        let caught = pokedex.get("pidgey").expect("pidgey should be present");

        assert_eq!(caught.pokemon.weight, 18);
        assert!(caught.caught_at.is_none());

        // Re-saving keeps the file readable and does not invent a timestamp
        pokedex.save(&path).expect("Save should succeed");
        let content = fs::read_to_string(&path).expect("Should read file");
        assert!(!content.contains("caught_at"));
        assert_eq!(Pokedex::load(&path).expect("Reload should succeed"), pokedex);
    }

    #[test]
    fn test_catch_key_and_api_name_both_find_entry() {
        let mut pokedex = Pokedex::new();
        let mut pikachu = pidgey();
        pikachu.name = "pikachu".to_string();
        pokedex.add("25", pikachu);

        assert!(pokedex.contains("25"));
        assert!(pokedex.contains("pikachu"));
        assert_eq!(pokedex.get("25").unwrap().pokemon.name, "pikachu");
        assert!(!pokedex.contains("pidgey"));
    }

    #[test]
    fn test_default_path_uses_project_name() {
        if let Ok(path) = Pokedex::default_path() {
            assert!(path.to_string_lossy().contains("pokedex"));
            assert!(path.ends_with(SAVE_FILE_NAME));
        }
        // Test passes if no home directory is available (e.g., in CI)
    }
}
