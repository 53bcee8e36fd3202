use clap::{Parser, Subcommand};

pub mod formatters;
pub mod help;
pub mod runner;

#[derive(Parser)]
#[command(name = "stockwatch")]
#[command(version, about = "Stock watch list with price snapshots and AI sentiment")]
#[command(
    long_about = "Keep a watch list of stock tickers, compare the latest close against 5, 10 and 30 calendar days ago, and mail a short AI sentiment report for each ticker."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch list management
    Watch {
        #[command(subcommand)]
        action: WatchCommands,
    },

    /// Show current price and 5/10/30 day changes for a ticker
    Snapshot {
        /// Ticker symbol (e.g., AAPL)
        ticker: String,

        /// Anchor date (YYYY-MM-DD); defaults to now
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Run the report for every watched ticker and mail the results
    Check {
        /// Print the reports without sending mail
        #[arg(short, long)]
        dry_run: bool,

        /// Only check these tickers instead of the watch list
        #[arg(short, long = "ticker")]
        tickers: Vec<String>,

        /// SEC form type under review (e.g. 8-K, 10-Q); overrides `ai.filing_form`
        #[arg(long)]
        filing: Option<String>,
    },

    /// Launch interactive console
    Interactive,
}

#[derive(Subcommand)]
pub enum WatchCommands {
    /// Add a ticker to the watch list
    Add {
        /// Ticker symbol (e.g., AAPL)
        ticker: String,
    },

    /// Remove a ticker from the watch list
    Remove {
        /// Ticker symbol (e.g., AAPL)
        ticker: String,
    },

    /// Show watched tickers
    List,
}
