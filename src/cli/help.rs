use colored::Colorize;
use std::io::{self, Write};

pub struct RenderOpts {
    pub show_examples: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        RenderOpts {
            show_examples: true,
        }
    }
}

pub fn render_help<W: Write>(mut out: W, opts: &RenderOpts) -> io::Result<()> {
    writeln!(out, "{}", "stockwatch - Help".bold())?;
    writeln!(out)?;

    writeln!(out, "{}  stockwatch <command> [options]", "Usage:".bold())?;
    writeln!(out)?;

    writeln!(out, "{}", "Watch list:".bold())?;
    writeln!(out, "  {:32} - Start watching a ticker", "add <TICKER>")?;
    writeln!(out, "  {:32} - Stop watching a ticker", "remove <TICKER>")?;
    writeln!(out, "  {:32} - Show watched tickers", "list")?;

    writeln!(out)?;
    writeln!(out, "{}", "Prices & reports:".bold())?;
    writeln!(
        out,
        "  {:32} - Current price vs 5/10/30 days ago",
        "snapshot <TICKER> [--as-of DATE]"
    )?;
    writeln!(
        out,
        "  {:32} - News, prices and AI judgment, then mail",
        "check [--dry-run] [--filing FORM] [TICKER...]"
    )?;

    writeln!(out)?;
    writeln!(out, "{}", "Session:".bold())?;
    writeln!(out, "  {:32} - Show this help", "help")?;
    writeln!(out, "  {:32} - Exit the console", "exit")?;

    writeln!(out)?;
    if opts.show_examples {
        writeln!(out, "{}", "Examples:".bold())?;
        writeln!(out, "  /add NVDA")?;
        writeln!(out, "  /snapshot AAPL --as-of 2025-06-30")?;
        writeln!(out, "  /check --dry-run")?;
        writeln!(out, "  /check --filing 8-K NVDA")?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "Outside the console the same commands are `stockwatch watch add`, `stockwatch snapshot` and `stockwatch check`."
    )?;
    Ok(())
}
