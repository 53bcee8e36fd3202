//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of data calculation from presentation.

use crate::pricing::Snapshot;
use crate::reports::TickerReport;
use crate::tickers::Ticker;
use crate::utils::{format_price, format_signed_percent, truncate_chars};
use colored::Colorize;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

const JUDGMENT_WIDTH: usize = 40;

fn colored_percent(pct: Decimal) -> String {
    let text = format_signed_percent(pct);
    if pct >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

/// Format the watch list
pub fn format_watchlist(tickers: &[Ticker]) -> String {
    if tickers.is_empty() {
        return format!(
            "{} Watch list is empty\nAdd one with: {} watch add <TICKER>\n",
            "ℹ".blue().bold(),
            "stockwatch".bold()
        );
    }

    #[derive(Tabled)]
    struct WatchRow {
        #[tabled(rename = "#")]
        position: usize,
        #[tabled(rename = "Ticker")]
        ticker: String,
    }

    let rows: Vec<WatchRow> = tickers
        .iter()
        .enumerate()
        .map(|(i, t)| WatchRow {
            position: i + 1,
            ticker: t.to_string(),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    format!(
        "\n{} Watching {} ticker{}\n\n{}\n",
        "👀".cyan().bold(),
        tickers.len(),
        if tickers.len() == 1 { "" } else { "s" },
        table
    )
}

/// Format a snapshot as the change report with colored percentages
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    let mut output = format!(
        "\n{} {} as of {}\n\n",
        "📈".cyan().bold(),
        snapshot.ticker.to_string().bold(),
        snapshot.as_of
    );
    output.push_str(&format!(
        "{:<12} {}\n",
        "Current:",
        format_price(snapshot.current.close).bold()
    ));
    for point in &snapshot.reference_points {
        output.push_str(&format!(
            "{:<12} {} ({})  {}\n",
            format!("{}:", point.label),
            format_price(point.matched.close),
            colored_percent(point.percent_change),
            format!("close of {}", point.matched.date).bright_black()
        ));
    }
    output
}

/// Format batch results as a summary table
pub fn format_check_table(reports: &[TickerReport]) -> String {
    #[derive(Tabled)]
    struct CheckRow {
        #[tabled(rename = "Ticker")]
        ticker: String,
        #[tabled(rename = "Price")]
        price: String,
        #[tabled(rename = "5D")]
        five: String,
        #[tabled(rename = "10D")]
        ten: String,
        #[tabled(rename = "30D")]
        thirty: String,
        #[tabled(rename = "Judgment")]
        judgment: String,
        #[tabled(rename = "Mail")]
        mail: String,
    }

    let rows: Vec<CheckRow> = reports
        .iter()
        .map(|r| {
            let (price, changes) = match &r.price {
                Ok(s) => (
                    format_price(s.current.close),
                    s.reference_points
                        .iter()
                        .map(|p| colored_percent(p.percent_change))
                        .collect::<Vec<_>>(),
                ),
                Err(_) => ("N/A".red().to_string(), Vec::new()),
            };
            let change = |i: usize| changes.get(i).cloned().unwrap_or_else(|| "-".to_string());

            let judgment = r.judgment_text();
            let judgment = truncate_chars(&judgment, JUDGMENT_WIDTH).to_string();

            let mail = match &r.delivery {
                None => "skipped".bright_black().to_string(),
                Some(Ok(())) => "sent".green().to_string(),
                Some(Err(_)) => "failed".red().to_string(),
            };

            CheckRow {
                ticker: r.ticker.to_string(),
                price,
                five: change(0),
                ten: change(1),
                thirty: change(2),
                judgment,
                mail,
            }
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align price and change columns
    table.modify(Columns::new(1..5), Alignment::right());

    let mut output = format!("\n{} Watch list report\n\n{}\n", "📊".cyan().bold(), table);

    for r in reports.iter().filter(|r| !r.is_clean()) {
        output.push_str(&format!("\n{} {}\n", "⚠".yellow().bold(), r.ticker.to_string().bold()));
        if let Err(e) = &r.price {
            output.push_str(&format!("  price: {}\n", e));
        }
        if let Err(e) = &r.headline {
            output.push_str(&format!("  news: {}\n", e));
        }
        if let Err(e) = &r.judgment {
            output.push_str(&format!("  judgment: {}\n", e));
        }
        if let Some(Err(e)) = &r.delivery {
            output.push_str(&format!("  mail: {}\n", e));
        }
    }

    output
}

/// Format batch results for JSON output
pub fn format_check_json(reports: &[TickerReport]) -> String {
    let payload: Vec<_> = reports.iter().map(|r| r.to_json()).collect();
    serde_json::to_string_pretty(&payload)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}
