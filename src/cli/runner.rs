use anyhow::{Context, Result};

use crate::cli::{Commands, WatchCommands};
use crate::commands::{self as cmd, Command};
use crate::tickers::Ticker;

fn ticker_arg(raw: &str) -> Result<Ticker> {
    Ticker::parse(raw).with_context(|| format!("Invalid ticker argument '{}'", raw))
}

/// Convert clap `Commands` into the internal `commands::Command`.
/// Returns Ok(None) for commands handled outside the dispatcher (the
/// interactive console) and Err on invalid arguments.
pub fn to_internal_command(c: &Commands) -> Result<Option<Command>> {
    match c {
        Commands::Watch { action } => match action {
            WatchCommands::Add { ticker } => Ok(Some(Command::Add {
                ticker: ticker_arg(ticker)?,
            })),
            WatchCommands::Remove { ticker } => Ok(Some(Command::Remove {
                ticker: ticker_arg(ticker)?,
            })),
            WatchCommands::List => Ok(Some(Command::List)),
        },

        Commands::Snapshot { ticker, as_of } => {
            let as_of = match as_of.as_deref() {
                Some(d) => Some(cmd::parse_as_of(d)?),
                None => None,
            };
            Ok(Some(Command::Snapshot {
                ticker: ticker_arg(ticker)?,
                as_of,
            }))
        }

        Commands::Check {
            dry_run,
            tickers,
            filing,
        } => {
            let tickers = tickers
                .iter()
                .map(|t| ticker_arg(t))
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(Command::Check {
                dry_run: *dry_run,
                tickers,
                filing: filing.as_ref().map(|f| f.trim().to_uppercase()),
            }))
        }

        Commands::Interactive => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn convert_snapshot_with_date() {
        let cmd = Commands::Snapshot {
            ticker: "aapl".to_string(),
            as_of: Some("2025-06-30".to_string()),
        };

        let converted = to_internal_command(&cmd).expect("conversion failed");
        match converted {
            Some(Command::Snapshot { ticker, as_of }) => {
                assert_eq!(ticker.as_str(), "AAPL");
                assert_eq!(as_of, NaiveDate::from_ymd_opt(2025, 6, 30));
            }
            other => panic!("unexpected converted result: {:?}", other),
        }
    }

    #[test]
    fn convert_rejects_bad_input() {
        let bad_date = Commands::Snapshot {
            ticker: "AAPL".to_string(),
            as_of: Some("June 30".to_string()),
        };
        assert!(to_internal_command(&bad_date).is_err());

        let bad_ticker = Commands::Check {
            dry_run: true,
            tickers: vec!["AAPL".to_string(), "NO WAY".to_string()],
            filing: None,
        };
        assert!(to_internal_command(&bad_ticker).is_err());
    }

    #[test]
    fn convert_check_upper_cases_filing_form() {
        let cmd = Commands::Check {
            dry_run: false,
            tickers: vec!["nvda".to_string()],
            filing: Some(" 10-q ".to_string()),
        };
        match to_internal_command(&cmd).unwrap() {
            Some(Command::Check { tickers, filing, .. }) => {
                assert_eq!(tickers[0].as_str(), "NVDA");
                assert_eq!(filing.as_deref(), Some("10-Q"));
            }
            other => panic!("unexpected converted result: {:?}", other),
        }
    }

    #[test]
    fn interactive_is_handled_elsewhere() {
        assert!(to_internal_command(&Commands::Interactive).unwrap().is_none());
    }
}
