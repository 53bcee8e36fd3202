// Reports module - per-ticker analysis over the whole watch list

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{JudgeError, NewsError, NotifyError, PriceError};
use crate::news::{latest_headline, Headline, NewsSource, NO_RECENT_NEWS};
use crate::notify::{Notification, Notifier};
use crate::pricing::{compute_snapshot, MarketDataSource, Snapshot};
use crate::sentiment::{SentimentJudge, NEUTRAL_PLACEHOLDER};
use crate::tickers::Ticker;

/// The collaborators a watch list report needs.
pub struct Services<'a> {
    pub prices: &'a dyn MarketDataSource,
    pub news: &'a dyn NewsSource,
    pub judge: &'a dyn SentimentJudge,
    pub notifier: &'a dyn Notifier,
}

/// Outcome of every step for one ticker. Each step fails independently.
#[derive(Debug)]
pub struct TickerReport {
    pub ticker: Ticker,
    pub price: Result<Snapshot, PriceError>,
    pub headline: Result<Option<Headline>, NewsError>,
    pub judgment: Result<String, JudgeError>,
    /// `None` when delivery was skipped (dry run)
    pub delivery: Option<Result<(), NotifyError>>,
}

impl TickerReport {
    /// Price section text: the change report or the error.
    pub fn price_text(&self) -> String {
        match &self.price {
            Ok(snapshot) => snapshot.report(),
            Err(e) => format!("Error fetching prices: {}", e),
        }
    }

    pub fn headline_text(&self) -> &str {
        match &self.headline {
            Ok(Some(h)) => &h.title,
            _ => NO_RECENT_NEWS,
        }
    }

    /// Judgment for display; failed judgments show the neutral placeholder.
    pub fn judgment_text(&self) -> String {
        match &self.judgment {
            Ok(text) => text.clone(),
            Err(e) => format!("{} ({})", NEUTRAL_PLACEHOLDER, e),
        }
    }

    pub fn notification(&self) -> Notification {
        Notification::for_ticker(
            &self.ticker,
            &self.judgment_text(),
            &self.price_text(),
            self.headline_text(),
        )
    }

    /// True when every attempted step succeeded.
    pub fn is_clean(&self) -> bool {
        self.price.is_ok()
            && self.headline.is_ok()
            && self.judgment.is_ok()
            && !matches!(self.delivery, Some(Err(_)))
    }

    pub fn to_json(&self) -> TickerReportJson {
        fn err_text<T, E: std::fmt::Display>(r: &Result<T, E>) -> Option<String> {
            r.as_ref().err().map(|e| e.to_string())
        }
        TickerReportJson {
            ticker: self.ticker.clone(),
            snapshot: self.price.as_ref().ok().cloned(),
            price_error: err_text(&self.price),
            headline: self.headline.as_ref().ok().cloned().flatten(),
            news_error: err_text(&self.headline),
            judgment: self.judgment.as_ref().ok().cloned(),
            judgment_error: err_text(&self.judgment),
            delivered: self.delivery.as_ref().map(|r| r.is_ok()),
            delivery_error: self.delivery.as_ref().and_then(|r| err_text(r)),
        }
    }
}

/// Serializable view of a [`TickerReport`].
#[derive(Debug, Serialize)]
pub struct TickerReportJson {
    pub ticker: Ticker,
    pub snapshot: Option<Snapshot>,
    pub price_error: Option<String>,
    pub headline: Option<Headline>,
    pub news_error: Option<String>,
    pub judgment: Option<String>,
    pub judgment_error: Option<String>,
    pub delivered: Option<bool>,
    pub delivery_error: Option<String>,
}

/// Gather price, news and judgment for one ticker, then optionally deliver.
pub async fn report_for_ticker<Tz: TimeZone>(
    services: &Services<'_>,
    ticker: &Ticker,
    as_of: DateTime<Tz>,
    deliver: bool,
) -> TickerReport {
    let headline = latest_headline(services.news, ticker).await;
    if let Err(e) = &headline {
        warn!("News unavailable for {}: {}", ticker, e);
    }

    let price = compute_snapshot(services.prices, ticker, as_of).await;
    if let Err(e) = &price {
        warn!("Price snapshot failed for {}: {}", ticker, e);
    }

    let headline_for_judge = match &headline {
        Ok(Some(h)) => h.title.as_str(),
        _ => NO_RECENT_NEWS,
    };
    let judgment = services.judge.judge(ticker, headline_for_judge).await;
    if let Err(e) = &judgment {
        warn!("AI judgment failed for {}: {}", ticker, e);
    }

    let mut report = TickerReport {
        ticker: ticker.clone(),
        price,
        headline,
        judgment,
        delivery: None,
    };

    if deliver {
        let result = services.notifier.notify(&report.notification()).await;
        if let Err(e) = &result {
            warn!("Mail failed for {}: {}", ticker, e);
        }
        report.delivery = Some(result);
    }

    report
}

/// Run [`report_for_ticker`] for each ticker in order. A failing ticker never
/// stops the batch.
pub async fn run_watchlist_report<Tz: TimeZone>(
    services: &Services<'_>,
    tickers: &[Ticker],
    as_of: DateTime<Tz>,
    deliver: bool,
) -> Vec<TickerReport> {
    info!(
        "Running watch list report for {} tickers (deliver: {})",
        tickers.len(),
        deliver
    );
    let mut reports = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        reports.push(report_for_ticker(services, ticker, as_of.clone(), deliver).await);
    }
    reports
}
