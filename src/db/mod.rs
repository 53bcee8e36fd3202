// Database module - SQLite connection and watch list rows

pub mod models;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use tracing::{debug, info};

pub use models::WatchedTicker;

/// Get the default database path (~/.stockwatch/watchlist.db)
pub fn get_default_db_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let app_dir = PathBuf::from(home).join(".stockwatch");

    std::fs::create_dir_all(&app_dir).context("Failed to create .stockwatch directory")?;

    Ok(app_dir.join("watchlist.db"))
}

fn resolve_path(db_path: Option<PathBuf>) -> Result<PathBuf> {
    match db_path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create database directory {:?}", parent))?;
            }
            Ok(path)
        }
        None => get_default_db_path(),
    }
}

/// Open database connection
pub fn open_db(db_path: Option<PathBuf>) -> Result<Connection> {
    let path = resolve_path(db_path)?;
    let conn = Connection::open(&path).context(format!("Failed to open database at {:?}", path))?;
    Ok(conn)
}

/// Run the schema SQL against an open connection. Idempotent.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    debug!("Applying watch list schema");
    conn.execute_batch(include_str!("schema.sql"))
        .context("Failed to execute schema")?;
    Ok(())
}

/// Insert a ticker unless already present. Returns true when a row was added.
pub fn insert_watched_ticker(conn: &Connection, ticker: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO watched_tickers (ticker, added_at) VALUES (?1, ?2)",
        params![ticker, Utc::now()],
    )?;
    if changed > 0 {
        info!("Added {} to watch list", ticker);
    }
    Ok(changed > 0)
}

/// Delete a ticker. Returns true when a row was removed.
pub fn delete_watched_ticker(conn: &Connection, ticker: &str) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "DELETE FROM watched_tickers WHERE ticker = ?1",
        params![ticker],
    )?;
    if changed > 0 {
        info!("Removed {} from watch list", ticker);
    }
    Ok(changed > 0)
}

/// All watched tickers in insertion order
pub fn list_watched_tickers(conn: &Connection) -> rusqlite::Result<Vec<WatchedTicker>> {
    let mut stmt =
        conn.prepare("SELECT id, ticker, added_at FROM watched_tickers ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(WatchedTicker {
            id: row.get(0)?,
            ticker: row.get(1)?,
            added_at: row.get(2)?,
        })
    })?;
    rows.collect()
}
