//! Interactive prompt loop
//!
//! Reads one command per line, dispatches it against the session and prints
//! errors without leaving the loop. End of input behaves like `exit`. Bytes
//! that are not valid UTF-8 are replaced rather than ending the session.

use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::commands::{Command, Outcome};
use crate::session::Session;

/// Prompt shown before each command
pub const PROMPT: &str = "Pokedex > ";

/// Runs the prompt loop until `exit` or end of input
pub async fn run<R, W>(session: &mut Session, input: R, out: &mut W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut input = input;
    let mut buf = Vec::new();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            writeln!(out)?;
            break;
        }
        let line = String::from_utf8_lossy(&buf);

        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            continue;
        };
        let args: Vec<&str> = words.collect();

        let Some(command) = Command::from_name(name) else {
            writeln!(out, "invalid command")?;
            continue;
        };

        debug!(command = command.name(), ?args, "running command");
        match command.execute(session, &args, out).await {
            Ok(Outcome::Continue) => {}
            Ok(Outcome::Exit) => break,
            Err(e) => writeln!(out, "{}", e)?,
        }
    }

    writeln!(out, "exiting program...")?;
    Ok(())
}
