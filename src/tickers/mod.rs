//! Ticker symbols and the watch list registry.

use rusqlite::Connection;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use crate::db;
use crate::error::RegistryError;

const MAX_TICKER_LEN: usize = 12;

/// Normalized ticker symbol (trimmed, upper-cased).
///
/// No exchange-list validation: unknown symbols are accepted here and
/// surface later as unavailable price data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self, RegistryError> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(RegistryError::InvalidTicker(
                "ticker must not be empty".to_string(),
            ));
        }
        if symbol.len() > MAX_TICKER_LEN {
            return Err(RegistryError::InvalidTicker(format!(
                "{} is longer than {} characters",
                symbol, MAX_TICKER_LEN
            )));
        }
        if let Some(c) = symbol
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
        {
            return Err(RegistryError::InvalidTicker(format!(
                "{} contains unsupported character '{}'",
                symbol, c
            )));
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ticker::parse(s)
    }
}

impl Serialize for Ticker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Persistent set of watched tickers.
pub trait TickerRegistry {
    /// Watched tickers in insertion order
    fn list(&self) -> Result<Vec<Ticker>, RegistryError>;
    /// Returns false when the ticker was already watched
    fn add(&self, ticker: &Ticker) -> Result<bool, RegistryError>;
    /// Returns false when the ticker was not watched
    fn remove(&self, ticker: &Ticker) -> Result<bool, RegistryError>;
}

/// Registry backed by the SQLite watch list database.
pub struct SqliteRegistry {
    conn: Connection,
}

impl SqliteRegistry {
    /// Open (creating if needed) the database at `path`, or the default path.
    pub fn open(path: Option<PathBuf>) -> anyhow::Result<Self> {
        let conn = db::open_db(path)?;
        db::apply_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        db::apply_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl TickerRegistry for SqliteRegistry {
    fn list(&self) -> Result<Vec<Ticker>, RegistryError> {
        db::list_watched_tickers(&self.conn)?
            .into_iter()
            .map(|row| Ticker::parse(&row.ticker))
            .collect()
    }

    fn add(&self, ticker: &Ticker) -> Result<bool, RegistryError> {
        Ok(db::insert_watched_ticker(&self.conn, ticker.as_str())?)
    }

    fn remove(&self, ticker: &Ticker) -> Result<bool, RegistryError> {
        Ok(db::delete_watched_ticker(&self.conn, ticker.as_str())?)
    }
}

/// In-process registry, used by tests and dry runs.
#[derive(Default)]
pub struct MemoryRegistry {
    tickers: Mutex<Vec<Ticker>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tickers<I, S>(tickers: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = Self::new();
        for raw in tickers {
            registry.add(&Ticker::parse(raw.as_ref())?)?;
        }
        Ok(registry)
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<Ticker>> {
        // A poisoned lock only means another test thread panicked mid-push
        self.tickers.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TickerRegistry for MemoryRegistry {
    fn list(&self) -> Result<Vec<Ticker>, RegistryError> {
        Ok(self.guard().clone())
    }

    fn add(&self, ticker: &Ticker) -> Result<bool, RegistryError> {
        let mut tickers = self.guard();
        if tickers.contains(ticker) {
            return Ok(false);
        }
        tickers.push(ticker.clone());
        Ok(true)
    }

    fn remove(&self, ticker: &Ticker) -> Result<bool, RegistryError> {
        let mut tickers = self.guard();
        let before = tickers.len();
        tickers.retain(|t| t != ticker);
        Ok(tickers.len() != before)
    }
}
