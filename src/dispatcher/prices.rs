use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use crate::cli::formatters::format_snapshot;
use crate::pricing::{compute_snapshot, compute_snapshot_now, MarketDataSource};
use crate::tickers::Ticker;

/// Anchor for an explicit `--as-of` date: the end of that day.
pub fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc())
}

pub async fn dispatch_snapshot(
    source: &dyn MarketDataSource,
    ticker: &Ticker,
    as_of: Option<NaiveDate>,
    json_output: bool,
) -> Result<()> {
    let result = match as_of.and_then(end_of_day) {
        Some(anchor) => {
            info!("Computing snapshot for {} at {}", ticker, anchor);
            compute_snapshot(source, ticker, anchor).await
        }
        None => compute_snapshot_now(source, ticker).await,
    };
    let snapshot = result.with_context(|| format!("Failed to compute snapshot for {}", ticker))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", format_snapshot(&snapshot));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PriceError;
    use crate::pricing::{InMemorySource, PricePoint, PriceSeries};
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_anchor_is_end_of_day() {
        let d = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let anchor = end_of_day(d).unwrap();
        assert_eq!(anchor.date_naive(), d);
        assert_eq!(anchor.to_rfc3339(), "2025-06-30T23:59:59+00:00");
    }

    #[tokio::test]
    async fn test_snapshot_for_unknown_ticker_fails_unavailable() {
        let source = InMemorySource::new();
        let err = dispatch_snapshot(&source, &Ticker::parse("ZZZZ").unwrap(), None, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to compute snapshot for ZZZZ"));
        assert!(matches!(
            err.downcast_ref::<PriceError>(),
            Some(PriceError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_as_of_past_date() {
        let d0 = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let ticker = Ticker::parse("ACME").unwrap();
        let series = PriceSeries::from_points([
            PricePoint::new(d0 - Duration::days(30), dec!(100)),
            PricePoint::new(d0, dec!(120)),
        ]);
        let source = InMemorySource::new().with_series(ticker.clone(), series);
        dispatch_snapshot(&source, &ticker, Some(d0), true)
            .await
            .unwrap();
    }
}
