//! News headlines for a ticker.

pub mod alphavantage;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NewsError;
use crate::tickers::Ticker;

pub use alphavantage::AlphaVantageNews;

/// Shown wherever a ticker has no headline.
pub const NO_RECENT_NEWS: &str = "No recent news";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub title: String,
    pub summary: Option<String>,
}

/// Producer of recent headlines, most relevant first.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn latest_headlines(&self, ticker: &Ticker) -> Result<Vec<Headline>, NewsError>;
}

/// First headline for `ticker`, if any.
pub async fn latest_headline(
    source: &dyn NewsSource,
    ticker: &Ticker,
) -> Result<Option<Headline>, NewsError> {
    Ok(source.latest_headlines(ticker).await?.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Vec<Headline>);

    #[async_trait]
    impl NewsSource for Canned {
        async fn latest_headlines(&self, _ticker: &Ticker) -> Result<Vec<Headline>, NewsError> {
            Ok(self.0.clone())
        }
    }

    fn headline(title: &str) -> Headline {
        Headline {
            title: title.to_string(),
            summary: None,
        }
    }

    #[tokio::test]
    async fn test_latest_headline_takes_first() {
        let source = Canned(vec![headline("first"), headline("second")]);
        let ticker = Ticker::parse("ACME").unwrap();
        let picked = latest_headline(&source, &ticker).await.unwrap();
        assert_eq!(picked.unwrap().title, "first");
    }

    #[tokio::test]
    async fn test_latest_headline_empty_feed() {
        let source = Canned(Vec::new());
        let ticker = Ticker::parse("ACME").unwrap();
        assert!(latest_headline(&source, &ticker).await.unwrap().is_none());
    }
}
