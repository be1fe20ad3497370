//! REPL command table and handlers
//!
//! A [`Session`] owns everything a command can touch: the API client (and with
//! it the response cache), the pagination cursor and the pokedex. Handlers
//! write to an injected writer so their output can be captured in tests.

use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data::{ApiError, HttpTransport, LocationAreaPage, PokeApiClient, Transport};
use crate::pagination::{PageCursor, PageError};
use crate::pokedex::{Pokedex, PokedexError};

/// Errors surfaced to the user by a command
///
/// None of these end the REPL; the loop prints them and reads the next line.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    MissingArgument(&'static str),

    #[error("you have not caught {0}")]
    NotCaught(String),

    #[error("refusing to overwrite {}: it could not be loaded at startup; move it aside to save", .0.display())]
    SaveFileUnreadable(PathBuf),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Pokedex(#[from] PokedexError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Every command the REPL understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
    Save,
}

/// Help-table row for a command
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub command: Command,
    /// Word typed to invoke the command
    pub name: &'static str,
    /// Name plus argument placeholder, as shown in help
    pub usage: &'static str,
    pub description: &'static str,
}

/// Commands in the order they are listed by `help`
pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        command: Command::Help,
        name: "help",
        usage: "help",
        description: "Displays a help message",
    },
    CommandInfo {
        command: Command::Map,
        name: "map",
        usage: "map",
        description: "Get the next page of locations",
    },
    CommandInfo {
        command: Command::MapBack,
        name: "mapb",
        usage: "mapb",
        description: "Get the previous page of locations",
    },
    CommandInfo {
        command: Command::Explore,
        name: "explore",
        usage: "explore <location_name>",
        description: "Explore a location",
    },
    CommandInfo {
        command: Command::Catch,
        name: "catch",
        usage: "catch <pokemon_name>",
        description: "Adds a Pokemon to your Pokedex",
    },
    CommandInfo {
        command: Command::Inspect,
        name: "inspect",
        usage: "inspect <pokemon_name>",
        description: "Checks a Pokemon's stats",
    },
    CommandInfo {
        command: Command::Pokedex,
        name: "pokedex",
        usage: "pokedex",
        description: "Lists all caught Pokemon",
    },
    CommandInfo {
        command: Command::Save,
        name: "save",
        usage: "save",
        description: "Saves your Pokedex",
    },
    CommandInfo {
        command: Command::Exit,
        name: "exit",
        usage: "exit",
        description: "Exit the Pokedex",
    },
];

impl Command {
    /// Looks up a command by the word typed at the prompt
    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.command)
    }
}

/// Whether the REPL should keep reading input after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// State shared by all commands for one REPL run
#[derive(Debug)]
pub struct Session<T = HttpTransport> {
    api: PokeApiClient<T>,
    cursor: PageCursor,
    pokedex: Pokedex,
    save_file: PathBuf,
    /// Set when `save_file` existed but failed to load
    save_file_unreadable: bool,
}

impl<T: Transport> Session<T> {
    pub fn new(api: PokeApiClient<T>, pokedex: Pokedex, save_file: PathBuf) -> Self {
        Self {
            api,
            cursor: PageCursor::new(),
            pokedex,
            save_file,
            save_file_unreadable: false,
        }
    }

    /// Marks the save file as one that failed to load
    ///
    /// `save` then refuses to overwrite it for as long as it is still there.
    pub fn protect_save_file(&mut self) {
        self.save_file_unreadable = true;
    }

    pub fn api(&self) -> &PokeApiClient<T> {
        &self.api
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn pokedex(&self) -> &Pokedex {
        &self.pokedex
    }

    /// Runs one command with its arguments
    pub async fn execute<W: Write>(
        &mut self,
        command: Command,
        args: &[String],
        out: &mut W,
    ) -> Result<Flow, CommandError> {
        debug!(?command, ?args, "Executing command");

        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Map => {
                let page = self.cursor.forward(&self.api).await?;
                print_page(&page, out)?;
            }
            Command::MapBack => {
                let page = self.cursor.backward(&self.api).await?;
                print_page(&page, out)?;
            }
            Command::Explore => {
                let name = single_arg(args, "you must provide a location name")?;
                self.explore(name, out).await?;
            }
            Command::Catch => {
                let name = single_arg(args, "you must provide a pokemon name")?;
                self.catch(name, out).await?;
            }
            Command::Inspect => {
                let name = single_arg(args, "you must provide a pokemon name")?;
                self.inspect(name, out)?;
            }
            Command::Pokedex => self.list_pokedex(out)?,
            Command::Save => self.save(out)?,
        }

        Ok(Flow::Continue)
    }

    fn save<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        if self.save_file_unreadable && self.save_file.exists() {
            warn!(path = %self.save_file.display(), "Not overwriting unreadable pokedex file");
            return Err(CommandError::SaveFileUnreadable(self.save_file.clone()));
        }

        writeln!(out, "Saving...")?;
        self.pokedex.save(&self.save_file)?;
        info!(path = %self.save_file.display(), "Pokedex saved");
        writeln!(out, "Pokedex Successfully Saved")?;
        Ok(())
    }

    fn help<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        writeln!(out)?;
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for info in COMMANDS {
            writeln!(out, "{}: {}", info.usage, info.description)?;
        }
        writeln!(out)?;
        Ok(())
    }

    async fn explore<W: Write>(&self, name: &str, out: &mut W) -> Result<(), CommandError> {
        let area = self.api.location_area(name).await?;

        writeln!(out)?;
        writeln!(out, "Exploring {}...", area.name)?;
        writeln!(out)?;
        writeln!(out, "Found Pokemon:")?;
        for encounter in &area.pokemon_encounters {
            writeln!(out, " - {}", encounter.pokemon.name)?;
        }
        writeln!(out)?;
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, out: &mut W) -> Result<(), CommandError> {
        let pokemon = self.api.pokemon(name).await?;

        writeln!(out)?;
        writeln!(out, "Throwing a Pokeball at {}...", pokemon.name)?;
        writeln!(out, "{} was caught!", pokemon.name)?;
        writeln!(out)?;
        self.pokedex.add(name, pokemon);
        Ok(())
    }

    fn inspect<W: Write>(&self, name: &str, out: &mut W) -> Result<(), CommandError> {
        let caught = self
            .pokedex
            .get(name)
            .ok_or_else(|| CommandError::NotCaught(name.to_string()))?;
        let pokemon = &caught.pokemon;

        writeln!(out)?;
        writeln!(out, "Name: {}", pokemon.name)?;
        writeln!(out, "Height: {}", pokemon.height)?;
        writeln!(out, "Weight: {}", pokemon.weight)?;
        writeln!(out, "Base Stats:")?;
        for stat in &pokemon.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "Types:")?;
        for kind in &pokemon.types {
            writeln!(out, "  - {}", kind.kind.name)?;
        }
        if let Some(caught_at) = caught.caught_at {
            writeln!(out, "Caught: {}", caught_at.format("%Y-%m-%d %H:%M UTC"))?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn list_pokedex<W: Write>(&self, out: &mut W) -> Result<(), CommandError> {
        writeln!(out)?;
        if self.pokedex.is_empty() {
            writeln!(out, "Your Pokedex is empty.")?;
        } else {
            writeln!(out, "Your Pokedex:")?;
            for (key, caught) in self.pokedex.iter() {
                if key == caught.pokemon.name {
                    writeln!(out, " - {}", key)?;
                } else {
                    writeln!(out, " - {} ({})", key, caught.pokemon.name)?;
                }
            }
        }
        writeln!(out)?;
        Ok(())
    }

    /// Stops the response cache reaper
    pub async fn shutdown(&mut self) {
        self.api.shutdown().await;
    }
}

fn print_page<W: Write>(page: &LocationAreaPage, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    for area in &page.results {
        writeln!(out, "{}", area.name)?;
    }
    writeln!(out)
}

fn single_arg<'a>(args: &'a [String], message: &'static str) -> Result<&'a str, CommandError> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(CommandError::MissingArgument(message)),
    }
}
