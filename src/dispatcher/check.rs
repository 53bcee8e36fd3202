use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use tracing::info;

use super::AppContext;
use crate::cli::formatters::{format_check_json, format_check_table};
use crate::reports::{run_watchlist_report, Services};
use crate::tickers::{Ticker, TickerRegistry};

pub async fn dispatch_check(
    ctx: &AppContext,
    tickers: Vec<Ticker>,
    filing: Option<&str>,
    dry_run: bool,
    json_output: bool,
) -> Result<()> {
    let tickers = if tickers.is_empty() {
        ctx.registry()?.list()?
    } else {
        tickers
    };

    if tickers.is_empty() {
        if json_output {
            println!("[]");
        } else {
            println!(
                "{} Watch list is empty, nothing to check",
                "ℹ".blue().bold()
            );
        }
        return Ok(());
    }

    let prices = ctx.market_data()?;
    let news = ctx.news()?;
    let judge = ctx.judge(filing)?;
    let notifier = ctx.notifier();
    let services = Services {
        prices: &prices,
        news: &news,
        judge: &judge,
        notifier: &notifier,
    };

    info!(
        "Checking {} tickers with {} (dry run: {})",
        tickers.len(),
        judge.model(),
        dry_run
    );
    let reports = run_watchlist_report(&services, &tickers, Local::now(), !dry_run).await;

    if json_output {
        println!("{}", format_check_json(&reports));
        return Ok(());
    }

    print!("{}", format_check_table(&reports));
    if dry_run {
        println!("\n{} Dry run - no mail sent", "ℹ".blue().bold());
    } else {
        let sent = reports
            .iter()
            .filter(|r| matches!(r.delivery, Some(Ok(()))))
            .count();
        println!(
            "\n{} Mailed {}/{} reports",
            "✓".green().bold(),
            sent,
            reports.len()
        );
    }
    Ok(())
}
