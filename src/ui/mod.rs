//! Interactive console
//!
//! A readline loop over the same command parser and dispatcher as the CLI.
//! Typing `/add NVDA` here is the console counterpart of
//! `stockwatch watch add NVDA`.

pub mod readline;

use crate::commands::{parse_command, Command};
use crate::dispatcher::{dispatch_command, AppContext};
use crate::tickers::TickerRegistry;
use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use tracing::debug;

pub const COMMAND_PATTERNS: &[&[&str]] = &[
    &["add"],
    &["remove"],
    &["list"],
    &["snapshot"],
    &["check"],
    &["watch", "add"],
    &["watch", "remove"],
    &["watch", "list"],
    &["help"],
    &["exit"],
    &["quit"],
];

/// Offer the current watch list for ticker completion.
fn refresh_tickers(rl: &mut readline::Readline, ctx: &AppContext) {
    match ctx.registry().and_then(|r| Ok(r.list()?)) {
        Ok(tickers) => rl.set_tickers(&tickers),
        Err(e) => debug!("Ticker completion unavailable: {:#}", e),
    }
}

/// Launch the interactive console REPL.
pub async fn launch_console(ctx: &AppContext) -> Result<()> {
    println!("{}", "stockwatch - Interactive Mode".bold());
    println!(
        "Type {} for help, {} to exit\n",
        "/help".cyan(),
        "/exit".cyan()
    );

    let mut rl = readline::Readline::new(COMMAND_PATTERNS, None)?;
    refresh_tickers(&mut rl, ctx);

    loop {
        match rl.readline("stockwatch> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Ok(Command::Exit) => {
                        println!("Goodbye!");
                        break;
                    }
                    Ok(cmd) => {
                        if let Err(e) = dispatch_command(cmd, ctx, false).await {
                            eprintln!("{} {:#}", "Error:".red().bold(), e);
                        }
                        refresh_tickers(&mut rl, ctx);
                    }
                    Err(e) => {
                        eprintln!("{} {}", "Parse error:".yellow().bold(), e.message);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}
