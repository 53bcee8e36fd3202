use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{Headline, NewsSource};
use crate::error::NewsError;
use crate::tickers::Ticker;

const ALPHA_VANTAGE_QUERY_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Deserialize)]
struct NewsSentimentResponse {
    feed: Option<Vec<FeedItem>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    title: Option<String>,
    summary: Option<String>,
}

/// Headlines from the Alpha Vantage `NEWS_SENTIMENT` endpoint.
pub struct AlphaVantageNews {
    client: Client,
    api_key: Option<String>,
}

impl AlphaVantageNews {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, NewsError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl NewsSource for AlphaVantageNews {
    async fn latest_headlines(&self, ticker: &Ticker) -> Result<Vec<Headline>, NewsError> {
        let api_key = self.api_key.as_deref().ok_or(NewsError::NotConfigured)?;
        info!("Fetching news sentiment feed for {}", ticker);

        let url = Url::parse_with_params(
            ALPHA_VANTAGE_QUERY_URL,
            &[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", ticker.as_str()),
                ("apikey", api_key),
            ],
        )
        .map_err(|e| NewsError::Provider(format!("invalid news URL: {}", e)))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(NewsError::Status(response.status().as_u16()));
        }
        let body = response.text().await?;
        let headlines = parse_news_response(&body)?;
        debug!("{} headlines for {}", headlines.len(), ticker);
        Ok(headlines)
    }
}

/// Decode a `NEWS_SENTIMENT` payload. Feed items without a title are dropped.
pub fn parse_news_response(body: &str) -> Result<Vec<Headline>, NewsError> {
    let data: NewsSentimentResponse =
        serde_json::from_str(body).map_err(|e| NewsError::Decode(e.to_string()))?;

    if let Some(message) = data.error_message {
        return Err(NewsError::Provider(message));
    }

    match data.feed {
        Some(feed) => Ok(feed
            .into_iter()
            .filter_map(|item| {
                let title = item.title?.trim().to_string();
                (!title.is_empty()).then(|| Headline {
                    title,
                    summary: item.summary.filter(|s| !s.trim().is_empty()),
                })
            })
            .collect()),
        None => match data.note.or(data.information) {
            Some(notice) => Err(NewsError::RateLimited(notice)),
            None => Ok(Vec::new()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_keeps_order() {
        let body = r#"{
            "items": "2",
            "feed": [
                {"title": "Acme beats estimates", "summary": "Revenue up 12%", "url": "https://x"},
                {"title": "Acme names new CFO", "summary": ""}
            ]
        }"#;
        let headlines = parse_news_response(body).unwrap();
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Acme beats estimates");
        assert_eq!(headlines[0].summary.as_deref(), Some("Revenue up 12%"));
        assert!(headlines[1].summary.is_none());
    }

    #[test]
    fn test_parse_empty_feed() {
        assert!(parse_news_response(r#"{"items": "0", "feed": []}"#)
            .unwrap()
            .is_empty());
        assert!(parse_news_response("{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rate_limit_notice() {
        let body = r#"{"Information": "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
        assert!(matches!(
            parse_news_response(body),
            Err(NewsError::RateLimited(_))
        ));
    }

    #[test]
    fn test_parse_error_message() {
        let body = r#"{"Error Message": "Invalid API call."}"#;
        assert!(matches!(parse_news_response(body), Err(NewsError::Provider(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let news = AlphaVantageNews::new(None, Duration::from_secs(1)).unwrap();
        let err = news
            .latest_headlines(&Ticker::parse("ACME").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsError::NotConfigured));
    }
}
