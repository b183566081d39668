//! Interactive session: one widget, one coupon flag, many commands.

use std::io::Write;

use anyhow::{bail, Result};
use cart_core::CartWidget;
use clap::{Parser, Subcommand};
use shared::domain::ProductDescriptor;
use storage::KeyValueStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

use crate::commands::{report, run_action, Action};

pub const PROMPT: &str = "cart> ";

#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    #[command(flatten)]
    Action(Action),
    /// End the session.
    #[command(alias = "exit")]
    Quit,
}

pub async fn run_session<S, R>(
    widget: &mut CartWidget<S>,
    catalog: &[ProductDescriptor],
    input: R,
    out: &mut impl Write,
) -> Result<()>
where
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        let words = match split_command_line(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };
        let parsed = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(err) => {
                write!(out, "{}", err.render())?;
                continue;
            }
        };

        match parsed.command {
            SessionCommand::Quit => break,
            SessionCommand::Action(action) => match run_action(widget, catalog, action).await {
                Ok(outcome) => report(out, widget, &outcome)?,
                Err(err) => {
                    warn!(error = %err, "session command failed");
                    writeln!(out, "error: {err:#}")?;
                }
            },
        }
    }
    Ok(())
}

/// Splits a command line on whitespace, keeping single- or double-quoted
/// runs together.
pub fn split_command_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
