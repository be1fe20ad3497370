//! Pokedex CLI - explore PokeAPI location areas from the terminal
//!
//! Parses arguments, loads the saved pokedex and runs the REPL on stdin.

use std::io;

use clap::Parser;
use crossterm::tty::IsTty;
use tracing::{info, warn};

use pokedex::cli::{Cli, Config};
use pokedex::commands::Session;
use pokedex::data::{Client, PokeApiClient};
use pokedex::logging::init_logging;
use pokedex::pokedex::Pokedex;
use pokedex::repl;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;

    init_logging(&config.log_level);
    info!("Starting Pokedex v{}", env!("CARGO_PKG_VERSION"));

    let client = Client::new(config.timeout, config.cache_interval)?;
    let api = PokeApiClient::new(client, config.base_url.as_str());

    // A broken save file should not keep the user out of the REPL, but it
    // must not be overwritten by `save` either
    let (caught, load_failed) = match Pokedex::load(&config.save_file) {
        Ok(caught) => (caught, false),
        Err(e) => {
            warn!(error = %e, "Failed to load pokedex");
            eprintln!("{}", e);
            (Pokedex::new(), true)
        }
    };
    info!(count = caught.len(), path = %config.save_file.display(), "Loaded pokedex");

    let mut session = Session::new(api, caught, config.save_file.clone());
    if load_failed {
        session.protect_save_file();
    }
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    let color = stdout.is_tty();

    repl::run(&mut session, stdin, &mut stdout, color).await?;

    session.shutdown().await;
    Ok(())
}
