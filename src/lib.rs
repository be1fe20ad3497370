//! Pokedex CLI Library
//!
//! An interactive explorer for PokeAPI location areas. Responses are memoized
//! in a time-bounded in-memory cache so paging back and forth and re-exploring
//! areas does not repeat network requests.

pub mod cache;
pub mod cli;
pub mod commands;
pub mod data;
pub mod logging;
pub mod pagination;
pub mod pokedex;
pub mod repl;
