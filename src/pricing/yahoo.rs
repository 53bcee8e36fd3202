use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{MarketDataSource, PricePoint, PriceSeries};
use crate::error::SourceError;
use crate::tickers::Ticker;

const YAHOO_CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; StockwatchBot/1.0)";

/// Yahoo Finance chart response
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: ChartData,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Meta {
    /// Exchange offset from UTC in seconds
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

/// Daily closes from the Yahoo Finance chart API.
pub struct YahooSource {
    client: Client,
}

impl YahooSource {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    fn chart_url(&self, ticker: &Ticker, start: NaiveDate, end: NaiveDate) -> Result<Url, SourceError> {
        // Inclusive range: midnight of start through the last second of end
        let period1 = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| SourceError::Provider("invalid start date".to_string()))?
            .and_utc()
            .timestamp();
        let period2 = end
            .and_hms_opt(23, 59, 59)
            .ok_or_else(|| SourceError::Provider("invalid end date".to_string()))?
            .and_utc()
            .timestamp();

        Url::parse_with_params(
            &format!("{}/{}", YAHOO_CHART_BASE_URL, ticker),
            &[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ],
        )
        .map_err(|e| SourceError::Provider(format!("invalid chart URL: {}", e)))
    }
}

#[async_trait]
impl MarketDataSource for YahooSource {
    async fn fetch_daily_closes(
        &self,
        ticker: &Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, SourceError> {
        info!(
            "Fetching daily closes for {} from {} to {} (Yahoo Finance)",
            ticker, start, end
        );
        let url = self.chart_url(ticker, start, end)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Unknown symbols come back as 404 with a chart error body
        if !status.is_success() && status.as_u16() != 404 {
            return Err(SourceError::Status(status.as_u16()));
        }

        let series = parse_chart_response(&body)?;
        debug!("Fetched {} daily closes for {}", series.len(), ticker);
        Ok(series.between(start, end))
    }
}

/// Decode a chart payload into a series.
///
/// A "Not Found" chart error yields an empty series; other chart errors are
/// provider errors. Days with a null close are skipped.
pub fn parse_chart_response(body: &str) -> Result<PriceSeries, SourceError> {
    let data: YahooChartResponse =
        serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))?;

    if let Some(error) = data.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            debug!("Yahoo reports unknown symbol: {}", error.description);
            return Ok(PriceSeries::empty());
        }
        return Err(SourceError::Provider(format!(
            "Yahoo Finance API error: {} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty());
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .and_then(|q| q.close)
        .unwrap_or_default();
    let offset = result.meta.gmtoffset.unwrap_or(0);

    let mut points = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let Some(close) = closes.get(i).copied().flatten() else {
            continue;
        };
        let date = chrono::DateTime::from_timestamp(timestamp + offset, 0)
            .ok_or_else(|| SourceError::Decode(format!("invalid timestamp {}", timestamp)))?
            .date_naive();
        let close = Decimal::from_f64(close)
            .ok_or_else(|| SourceError::Decode(format!("invalid close price for {}", date)))?;
        points.push(PricePoint::new(date, close));
    }

    Ok(PriceSeries::from_points(points))
}
