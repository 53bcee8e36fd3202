use chrono::{DateTime, Utc};
use serde::Serialize;

/// A row of the `watched_tickers` table
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WatchedTicker {
    pub id: i64,
    pub ticker: String,
    pub added_at: DateTime<Utc>,
}
