// Pricing module - daily close series, market data sources and the snapshot engine

pub mod snapshot;
pub mod yahoo;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::error::SourceError;
use crate::tickers::Ticker;

pub use snapshot::{compute_snapshot, compute_snapshot_now, ReferencePoint, Snapshot};

/// One daily close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self { date, close }
    }
}

/// Daily closes ordered ascending by date, one point per date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points in any order. For duplicate dates the
    /// point supplied last wins.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points.into_iter().collect();
        // Stable sort keeps supply order within a date
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self { points: deduped }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Points dated on or before `date`
    pub fn up_to(&self, date: NaiveDate) -> &[PricePoint] {
        let end = self.points.partition_point(|p| p.date <= date);
        &self.points[..end]
    }

    /// Points within `[start, end]`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceSeries {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }
}

/// Producer of daily close history for a ticker.
///
/// Implementations return an empty series when the ticker is unknown or has
/// no data in range; transport problems are errors.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch_daily_closes(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError>;
}

/// Market data held in memory, keyed by ticker.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<Ticker, PriceSeries>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: Ticker, series: PriceSeries) -> Self {
        self.series.insert(ticker, series);
        self
    }
}

#[async_trait]
impl MarketDataSource for InMemorySource {
    async fn fetch_daily_closes(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        let series = self
            .series
            .get(ticker)
            .map(|s| s.between(start, end))
            .unwrap_or_default();
        debug!("In-memory source returned {} closes for {}", series.len(), ticker);
        Ok(series)
    }
}
