//! Price snapshot engine
//!
//! Given a ticker and an anchor date, fetches ~45 calendar days of daily
//! closes and derives the current price plus the change against the closes
//! nearest to 5, 10 and 30 calendar days before the anchor.
//!
//! Reference closes are matched by nearest date, never by row offset, so gaps
//! for weekends, holidays or a short listing history degrade gracefully.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

use super::{MarketDataSource, PricePoint, PriceSeries};
use crate::error::PriceError;
use crate::tickers::Ticker;
use crate::utils::{format_price, format_signed_percent};

/// Calendar days requested before the anchor; enough to cover a 30 day
/// offset across weekends and holidays.
pub const LOOKBACK_DAYS: i64 = 45;

/// Reference offsets in calendar days, in report order.
pub const REFERENCE_OFFSETS: [i64; 3] = [5, 10, 30];

/// A historical close compared against the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferencePoint {
    pub label: String,
    pub offset_days: i64,
    pub target_date: NaiveDate,
    pub matched: PricePoint,
    pub percent_change: Decimal,
}

/// Current close plus the three reference points. Computed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub ticker: Ticker,
    pub as_of: NaiveDate,
    pub current: PricePoint,
    pub reference_points: Vec<ReferencePoint>,
}

impl Snapshot {
    /// Human-readable change report:
    ///
    /// ```text
    /// Current: $140.00
    /// 5-Day Ago: $130.00 (+7.69%)
    /// ```
    pub fn report(&self) -> String {
        let mut lines = Vec::with_capacity(self.reference_points.len() + 1);
        lines.push(format!("Current: {}", format_price(self.current.close)));
        for point in &self.reference_points {
            lines.push(format!(
                "{}: {} ({})",
                point.label,
                format_price(point.matched.close),
                format_signed_percent(point.percent_change)
            ));
        }
        lines.join("\n")
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

/// Fetch history from `source` and compute the snapshot anchored at `as_of`.
///
/// The anchor is the calendar date of `as_of` in its own time zone, so pass a
/// local timestamp to anchor on the local trading day.
/// Source failures of any kind are reported as [`PriceError::Unavailable`].
pub async fn compute_snapshot<Tz: TimeZone>(
    source: &dyn MarketDataSource,
    ticker: &Ticker,
    as_of: DateTime<Tz>,
) -> Result<Snapshot, PriceError> {
    let anchor = as_of.date_naive();
    let start = anchor - Duration::days(LOOKBACK_DAYS);
    info!("Computing price snapshot for {} as of {}", ticker, anchor);

    let series = source
        .fetch_daily_closes(ticker, start, anchor)
        .await
        .map_err(|e| PriceError::Unavailable(format!("{}: {}", ticker, e)))?;

    snapshot_from_series(ticker, &series, anchor)
}

/// [`compute_snapshot`] anchored at the current local time.
pub async fn compute_snapshot_now(
    source: &dyn MarketDataSource,
    ticker: &Ticker,
) -> Result<Snapshot, PriceError> {
    compute_snapshot(source, ticker, Local::now()).await
}

/// Pure part of the engine: derive a snapshot from an already fetched series.
pub fn snapshot_from_series(
    ticker: &Ticker,
    series: &PriceSeries,
    as_of: NaiveDate,
) -> Result<Snapshot, PriceError> {
    let points = series.up_to(as_of);

    let current = *points
        .last()
        .ok_or_else(|| PriceError::Unavailable(format!("no price data for {}", ticker)))?;

    if points.len() < 2 {
        return Err(PriceError::InvalidData(format!(
            "{} has only {} close on or before {}; need at least 2",
            ticker,
            points.len(),
            as_of
        )));
    }

    let reference_points = REFERENCE_OFFSETS
        .iter()
        .map(|&offset| -> Result<ReferencePoint, PriceError> {
            let target_date = as_of - Duration::days(offset);
            // points is non-empty, nearest always finds something
            let matched = *nearest_point(points, target_date).ok_or_else(|| {
                PriceError::Unavailable(format!("no price data for {}", ticker))
            })?;
            let percent_change = percent_change(current.close, matched.close).map_err(|e| {
                match e {
                    PriceError::InvalidData(msg) => PriceError::InvalidData(format!(
                        "{} {}-day reference ({}): {}",
                        ticker, offset, matched.date, msg
                    )),
                    other => other,
                }
            })?;
            debug!(
                "{} {}-day target {} matched {} at {}",
                ticker, offset, target_date, matched.date, matched.close
            );
            Ok(ReferencePoint {
                label: format!("{}-Day Ago", offset),
                offset_days: offset,
                target_date,
                matched,
                percent_change,
            })
        })
        .collect::<Result<Vec<_>, PriceError>>()?;

    Ok(Snapshot {
        ticker: ticker.clone(),
        as_of,
        current,
        reference_points,
    })
}

/// Point whose date is closest to `target`. Equal distances resolve to the
/// earlier date. `points` must be sorted ascending by date.
pub fn nearest_point(points: &[PricePoint], target: NaiveDate) -> Option<&PricePoint> {
    let idx = points.partition_point(|p| p.date < target);
    let before = idx.checked_sub(1).and_then(|i| points.get(i));
    let after = points.get(idx);

    match (before, after) {
        (Some(b), Some(a)) => {
            let dist_before = target.signed_duration_since(b.date);
            let dist_after = a.date.signed_duration_since(target);
            if dist_after < dist_before {
                Some(a)
            } else {
                Some(b)
            }
        }
        (Some(b), None) => Some(b),
        (None, a) => a,
    }
}

/// `(current - reference) / reference * 100`; zero reference is invalid.
pub fn percent_change(current: Decimal, reference: Decimal) -> Result<Decimal, PriceError> {
    if reference.is_zero() {
        return Err(PriceError::InvalidData(
            "reference price is zero, relative change is undefined".to_string(),
        ));
    }
    current
        .checked_sub(reference)
        .and_then(|diff| diff.checked_div(reference))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| {
            PriceError::InvalidData(format!(
                "relative change of {} against {} is out of range",
                current, reference
            ))
        })
}
