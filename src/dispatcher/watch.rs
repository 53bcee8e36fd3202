use anyhow::Result;
use colored::Colorize;

use crate::cli::formatters::format_watchlist;
use crate::tickers::{Ticker, TickerRegistry};

pub fn dispatch_add(registry: &dyn TickerRegistry, ticker: &Ticker, json_output: bool) -> Result<()> {
    let added = registry.add(ticker)?;
    if json_output {
        println!(
            "{}",
            serde_json::json!({
                "ticker": ticker,
                "added": added,
            })
        );
    } else if added {
        println!("{} Watching {}", "✓".green().bold(), ticker.to_string().bold());
    } else {
        println!("{} {} is already on the watch list", "ℹ".blue().bold(), ticker);
    }
    Ok(())
}

pub fn dispatch_remove(
    registry: &dyn TickerRegistry,
    ticker: &Ticker,
    json_output: bool,
) -> Result<()> {
    let removed = registry.remove(ticker)?;
    if json_output {
        println!(
            "{}",
            serde_json::json!({
                "ticker": ticker,
                "removed": removed,
            })
        );
    } else if removed {
        println!("{} Stopped watching {}", "✓".green().bold(), ticker.to_string().bold());
    } else {
        println!("{} {} is not on the watch list", "ℹ".blue().bold(), ticker);
    }
    Ok(())
}

pub fn dispatch_list(registry: &dyn TickerRegistry, json_output: bool) -> Result<()> {
    let tickers = registry.list()?;
    if json_output {
        println!("{}", serde_json::to_string_pretty(&tickers)?);
        return Ok(());
    }
    print!("{}", format_watchlist(&tickers));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickers::MemoryRegistry;

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let registry = MemoryRegistry::new();
        let ticker = Ticker::parse("AAPL").unwrap();
        dispatch_add(&registry, &ticker, false).unwrap();
        dispatch_add(&registry, &ticker, true).unwrap();
        assert_eq!(registry.list().unwrap(), vec![ticker]);
    }

    #[test]
    fn test_remove_unknown_is_not_an_error() {
        let registry = MemoryRegistry::with_tickers(["MSFT"]).unwrap();
        dispatch_remove(&registry, &Ticker::parse("AAPL").unwrap(), false).unwrap();
        assert_eq!(registry.list().unwrap().len(), 1);
        dispatch_list(&registry, true).unwrap();
    }
}
