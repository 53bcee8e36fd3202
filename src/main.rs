use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use stockwatch::cli::runner::to_internal_command;
use stockwatch::cli::{Cli, Commands};
use stockwatch::config::Config;
use stockwatch::dispatcher::{dispatch_command, AppContext};
use stockwatch::ui;

#[tokio::main]
async fn main() {
    // Logs go to stderr so `--json` output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    debug!("Loaded configuration: {:?}", config);
    let ctx = AppContext::new(config);

    let command = match cli.command {
        None | Some(Commands::Interactive) => return ui::launch_console(&ctx).await,
        Some(ref c) => to_internal_command(c)?,
    };

    match command {
        Some(cmd) => dispatch_command(cmd, &ctx, cli.json).await,
        None => ui::launch_console(&ctx).await,
    }
}
