//! Command dispatcher that routes parsed `Command`s to their handlers.
//!
//! Both the clap front end and the interactive console end up here, so the
//! two surfaces behave the same. Adapters are built from [`Config`] on demand;
//! a missing credential only matters for the command that needs it.

mod check;
mod prices;
mod watch;

use anyhow::{Context, Result};

use crate::cli::help::{render_help, RenderOpts};
use crate::commands::Command;
use crate::config::Config;
use crate::news::AlphaVantageNews;
use crate::notify::SmtpNotifier;
use crate::pricing::yahoo::YahooSource;
use crate::sentiment::{filing_context, GeminiJudge};
use crate::tickers::SqliteRegistry;

/// Everything a handler needs that outlives a single command.
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn registry(&self) -> Result<SqliteRegistry> {
        SqliteRegistry::open(self.config.db_path.clone()).context("Failed to open watch list")
    }

    pub fn market_data(&self) -> Result<YahooSource> {
        YahooSource::new(self.config.http_timeout()).context("Failed to build market data client")
    }

    pub fn news(&self) -> Result<AlphaVantageNews> {
        AlphaVantageNews::new(
            self.config.credentials.alpha_key.clone(),
            self.config.http_timeout(),
        )
        .context("Failed to build news client")
    }

    /// AI judge for a check. An explicit filing form wins over `ai.filing_form`.
    pub fn judge(&self, filing: Option<&str>) -> Result<GeminiJudge> {
        let judge = GeminiJudge::new(
            self.config.credentials.gemini_api_key.clone(),
            self.config.ai.model.clone(),
            self.config.http_timeout(),
        )
        .context("Failed to build AI client")?;
        Ok(match filing.or(self.config.ai.filing_form.as_deref()) {
            Some(form) => judge.with_filing(filing_context(form)),
            None => judge,
        })
    }

    pub fn notifier(&self) -> SmtpNotifier {
        SmtpNotifier::new(
            self.config.smtp.clone(),
            &self.config.credentials,
            self.config.http_timeout(),
        )
    }
}

/// Route a parsed command to its handler
pub async fn dispatch_command(command: Command, ctx: &AppContext, json_output: bool) -> Result<()> {
    match command {
        Command::Add { ticker } => watch::dispatch_add(&ctx.registry()?, &ticker, json_output),
        Command::Remove { ticker } => {
            watch::dispatch_remove(&ctx.registry()?, &ticker, json_output)
        }
        Command::List => watch::dispatch_list(&ctx.registry()?, json_output),
        Command::Snapshot { ticker, as_of } => {
            prices::dispatch_snapshot(&ctx.market_data()?, &ticker, as_of, json_output).await
        }
        Command::Check {
            dry_run,
            tickers,
            filing,
        } => check::dispatch_check(ctx, tickers, filing.as_deref(), dry_run, json_output).await,
        Command::Help => {
            render_help(std::io::stdout().lock(), &RenderOpts::default())?;
            Ok(())
        }
        Command::Exit => {
            std::process::exit(0);
        }
    }
}
