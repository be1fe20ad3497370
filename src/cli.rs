//! Command-line interface parsing for the Pokedex CLI
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the validated [`Config`] used to build the API client and REPL session.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::data::DEFAULT_BASE_URL;
use crate::pokedex::{Pokedex, PokedexError};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A duration flag was set to zero
    #[error("Invalid value for --{0}: must be greater than zero")]
    ZeroDuration(&'static str),

    #[error(transparent)]
    SavePath(#[from] PokedexError),
}

/// Pokedex CLI - explore location areas and catch pokemon
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive PokeAPI explorer")]
#[command(version)]
pub struct Cli {
    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub timeout_secs: u64,

    /// How long API responses stay cached, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub cache_interval_secs: u64,

    /// Where the pokedex is saved (defaults to the platform data directory)
    #[arg(long, value_name = "PATH")]
    pub save_file: Option<PathBuf>,

    /// PokeAPI root URL
    #[arg(long, value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
    /// Reap period and maximum age of cached responses
    pub cache_interval: Duration,
    /// Pokedex save file
    pub save_file: PathBuf,
    /// PokeAPI root URL
    pub base_url: String,
    /// Fallback log filter
    pub log_level: String,
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Config)` with durations converted and the save path resolved
    /// * `Err(CliError)` if a duration is zero or no save path can be determined
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.timeout_secs == 0 {
            return Err(CliError::ZeroDuration("timeout-secs"));
        }
        if cli.cache_interval_secs == 0 {
            return Err(CliError::ZeroDuration("cache-interval-secs"));
        }

        let save_file = match &cli.save_file {
            Some(path) => path.clone(),
            None => Pokedex::default_path()?,
        };

        Ok(Config {
            timeout: Duration::from_secs(cli.timeout_secs),
            cache_interval: Duration::from_secs(cli.cache_interval_secs),
            save_file,
            base_url: cli.base_url.clone(),
            log_level: cli.log_level.clone(),
        })
    }
}
