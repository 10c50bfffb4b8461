//! REPL commands
//!
//! Each command reads the session, fetches what it needs through the cache and
//! writes its output to the given writer. Handlers never print directly, so
//! they can be driven from tests.

use std::io::{self, Write};
use thiserror::Error;

use crate::data::{location_area_url, pokemon_url, LocationArea, LocationAreaPage, Pokemon};
use crate::session::{Session, SessionError};

/// Base experience that a roll is measured against when catching
const CATCH_BASELINE: f64 = 25.0;

/// Errors a command can report back to the REPL
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required argument was not given
    #[error("{0}")]
    MissingArgument(&'static str),

    /// Fetching or decoding the API resource failed
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Writing the output failed
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// What the REPL should do after a command ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Every command the REPL understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Entries,
    Explore,
    Catch,
    Inspect,
    Pokedex,
}

impl Command {
    /// All commands in the order `help` lists them
    pub const ALL: [Command; 9] = [
        Command::Help,
        Command::Exit,
        Command::Map,
        Command::MapBack,
        Command::Entries,
        Command::Explore,
        Command::Catch,
        Command::Inspect,
        Command::Pokedex,
    ];

    /// Name typed at the prompt
    pub fn name(self) -> &'static str {
        match self {
            Command::Help => "help",
            Command::Exit => "exit",
            Command::Map => "map",
            Command::MapBack => "mapb",
            Command::Entries => "entries",
            Command::Explore => "explore",
            Command::Catch => "catch",
            Command::Inspect => "inspect",
            Command::Pokedex => "pokedex",
        }
    }

    /// One-line summary printed by `help`
    pub fn description(self) -> &'static str {
        match self {
            Command::Help => "Displays a help message",
            Command::Exit => "Exit the Pokedex",
            Command::Map => "Displays the next 20 map locations",
            Command::MapBack => "Displays the previous 20 map locations",
            Command::Entries => "Displays urls of all cached entries",
            Command::Explore => "Displays Pokemon available in the area",
            Command::Catch => "Attempts to catch a pokemon",
            Command::Inspect => "Reveals information about a pokemon",
            Command::Pokedex => "Lists the pokemon the user has caught",
        }
    }

    /// Looks up a command by name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    /// Runs the command against `session`
    pub async fn execute<W: Write>(
        self,
        session: &mut Session,
        args: &[&str],
        out: &mut W,
    ) -> Result<Outcome, CommandError> {
        match self {
            Command::Help => help(out)?,
            Command::Exit => return Ok(Outcome::Exit),
            Command::Map => {
                let url = session.next_page_url();
                show_page(session, url, out).await?
            }
            Command::MapBack => {
                let url = session.previous_page_url();
                show_page(session, url, out).await?
            }
            Command::Entries => entries(session, out)?,
            Command::Explore => explore(session, args, out).await?,
            Command::Catch => catch(session, args, out).await?,
            Command::Inspect => inspect(session, args, out).await?,
            Command::Pokedex => pokedex(session, out)?,
        }
        Ok(Outcome::Continue)
    }
}

fn help<W: Write>(out: &mut W) -> Result<(), CommandError> {
    writeln!(out, "Usage:")?;
    writeln!(out)?;
    for cmd in Command::ALL {
        writeln!(out, "{}: {}", cmd.name(), cmd.description())?;
    }
    writeln!(out)?;
    Ok(())
}

async fn show_page<W: Write>(
    session: &mut Session,
    url: String,
    out: &mut W,
) -> Result<(), CommandError> {
    let page: LocationAreaPage = session.fetch_json(&url).await?;

    for area in &page.results {
        writeln!(out, "{}", area.name)?;
    }
    session.set_page(url, page.next, page.previous);
    Ok(())
}

fn entries<W: Write>(session: &Session, out: &mut W) -> Result<(), CommandError> {
    for key in session.client().store().keys() {
        writeln!(out, "{}", key)?;
    }
    Ok(())
}

async fn explore<W: Write>(
    session: &mut Session,
    args: &[&str],
    out: &mut W,
) -> Result<(), CommandError> {
    let area = args
        .first()
        .ok_or(CommandError::MissingArgument("no location argument given"))?;
    let url = location_area_url(session.base_url(), area);
    let location: LocationArea = session.fetch_json(&url).await?;

    for name in location.pokemon_names() {
        writeln!(out, " - {}", name)?;
    }
    Ok(())
}

/// Decides a catch: the roll must reach `25 / base_experience`
///
/// Pokemon with unknown or zero base experience are always caught.
pub fn catch_succeeds(base_experience: Option<u32>, roll: f64) -> bool {
    match base_experience {
        None | Some(0) => true,
        Some(exp) => roll >= CATCH_BASELINE / f64::from(exp),
    }
}

async fn catch<W: Write>(
    session: &mut Session,
    args: &[&str],
    out: &mut W,
) -> Result<(), CommandError> {
    let name = args
        .first()
        .ok_or(CommandError::MissingArgument("no pokemon argument given"))?;
    let url = pokemon_url(session.base_url(), name);
    let pokemon: Pokemon = session.fetch_json(&url).await?;

    if catch_succeeds(pokemon.base_experience, session.roll()) {
        writeln!(out, "{} was caught!", name)?;
        session.add_caught(&pokemon.name);
    } else {
        writeln!(out, "{} escaped!", name)?;
    }
    Ok(())
}

async fn inspect<W: Write>(
    session: &mut Session,
    args: &[&str],
    out: &mut W,
) -> Result<(), CommandError> {
    let name = args
        .first()
        .ok_or(CommandError::MissingArgument("no pokemon argument given"))?;
    let url = pokemon_url(session.base_url(), name);
    let pokemon: Pokemon = session.fetch_json(&url).await?;

    writeln!(out, "Name: {}", pokemon.name)?;
    writeln!(out, "Height: {}", pokemon.height)?;
    writeln!(out, "Weight: {}", pokemon.weight)?;
    writeln!(out, "Stats:")?;
    for stat in &pokemon.stats {
        writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
    }
    writeln!(out, "Types:")?;
    for kind in &pokemon.types {
        writeln!(out, "  - {}", kind.kind.name)?;
    }
    Ok(())
}

fn pokedex<W: Write>(session: &Session, out: &mut W) -> Result<(), CommandError> {
    if session.caught().is_empty() {
        writeln!(out, "You have no pokemon...")?;
        return Ok(());
    }

    writeln!(out, "Your pokemon")?;
    for name in session.caught() {
        writeln!(out, "  - {}", name)?;
    }
    Ok(())
}
