//! Command parsing and routing layer
//!
//! A small parser shared by the interactive console and the clap front end,
//! so `/add AAPL` typed at the prompt and `stockwatch watch add AAPL` reach
//! the same handler.

use chrono::NaiveDate;

use crate::tickers::Ticker;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Watch a ticker: `add <TICKER>` or `watch add <TICKER>`
    Add { ticker: Ticker },
    /// Stop watching a ticker: `remove <TICKER>` or `watch remove <TICKER>`
    Remove { ticker: Ticker },
    /// Show the watch list: `list` or `watch list`
    List,
    /// Price snapshot: `snapshot <TICKER> [--as-of YYYY-MM-DD]`
    Snapshot {
        ticker: Ticker,
        as_of: Option<NaiveDate>,
    },
    /// Full report: `check [--dry-run] [--filing FORM] [TICKER...]`
    Check {
        dry_run: bool,
        tickers: Vec<Ticker>,
        /// SEC form type under review, overrides the configured one
        filing: Option<String>,
    },
    /// Show help
    Help,
    /// Exit/quit
    Exit,
}

/// Error type for command parsing
#[derive(Debug, Clone)]
pub struct CommandParseError {
    pub message: String,
}

impl CommandParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a `YYYY-MM-DD` anchor date
pub fn parse_as_of(s: &str) -> Result<NaiveDate, CommandParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        CommandParseError::new(format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
    })
}

fn parse_ticker(raw: Option<&str>, usage: &str) -> Result<Ticker, CommandParseError> {
    let raw = raw
        .ok_or_else(|| CommandParseError::new(format!("Missing ticker. Usage: {}", usage)))?;
    Ticker::parse(raw).map_err(|e| CommandParseError::new(e.to_string()))
}

/// Parse a command line. A leading `/` is optional; the command word is
/// case-insensitive and tickers are upper-cased.
pub fn parse_command(input: &str) -> Result<Command, CommandParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(CommandParseError::new(
            "Empty command. Type `/help` for commands.",
        ));
    }

    let input = input.strip_prefix('/').unwrap_or(input);
    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| CommandParseError::new("No command provided"))?
        .to_lowercase();

    // `watch add X` is the long form of `add X`
    let cmd = if cmd == "watch" {
        parts
            .next()
            .ok_or_else(|| {
                CommandParseError::new("watch requires action (add, remove, list)")
            })?
            .to_lowercase()
    } else {
        cmd
    };

    match cmd.as_str() {
        "add" => Ok(Command::Add {
            ticker: parse_ticker(parts.next(), "add <TICKER>")?,
        }),
        "remove" | "rm" => Ok(Command::Remove {
            ticker: parse_ticker(parts.next(), "remove <TICKER>")?,
        }),
        "list" | "ls" => Ok(Command::List),
        "snapshot" | "price" => {
            let ticker = parse_ticker(parts.next(), "snapshot <TICKER> [--as-of YYYY-MM-DD]")?;
            let mut as_of = None;
            while let Some(arg) = parts.next() {
                match arg {
                    "--as-of" => {
                        let value = parts.next().ok_or_else(|| {
                            CommandParseError::new("--as-of requires a date (YYYY-MM-DD)")
                        })?;
                        as_of = Some(parse_as_of(value)?);
                    }
                    other => {
                        return Err(CommandParseError::new(format!(
                            "Unexpected argument '{}' for snapshot",
                            other
                        )))
                    }
                }
            }
            Ok(Command::Snapshot { ticker, as_of })
        }
        "check" | "report" => {
            let mut dry_run = false;
            let mut tickers = Vec::new();
            let mut filing = None;
            while let Some(arg) = parts.next() {
                match arg {
                    "--dry-run" => dry_run = true,
                    "--filing" => {
                        let form = parts.next().ok_or_else(|| {
                            CommandParseError::new("--filing requires a form type (e.g. 8-K)")
                        })?;
                        filing = Some(form.to_uppercase());
                    }
                    _ => tickers.push(parse_ticker(
                        Some(arg),
                        "check [--dry-run] [--filing FORM] [TICKER...]",
                    )?),
                }
            }
            Ok(Command::Check {
                dry_run,
                tickers,
                filing,
            })
        }
        "help" | "?" => Ok(Command::Help),
        "exit" | "quit" => Ok(Command::Exit),
        other => Err(CommandParseError::new(format!(
            "Unknown command '{}'. Type `/help` for commands.",
            other
        ))),
    }
}
