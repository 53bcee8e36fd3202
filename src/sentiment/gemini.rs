use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::{build_prompt, SentimentJudge, STANDARD_REVIEW};
use crate::error::JudgeError;
use crate::tickers::Ticker;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Sentiment judge backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiJudge {
    client: Client,
    api_key: Option<String>,
    model: String,
    filing: String,
}

impl GeminiJudge {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, JudgeError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model: model.into(),
            filing: STANDARD_REVIEW.to_string(),
        })
    }

    /// Filing context included in the prompt, e.g. from [`super::filing_context`].
    pub fn with_filing(mut self, filing: impl Into<String>) -> Self {
        self.filing = filing.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt_for(&self, ticker: &Ticker, headline: &str) -> String {
        build_prompt(ticker, headline, &self.filing)
    }
}

#[async_trait]
impl SentimentJudge for GeminiJudge {
    async fn judge(&self, ticker: &Ticker, headline: &str) -> Result<String, JudgeError> {
        let api_key = self.api_key.as_deref().ok_or(JudgeError::NotConfigured)?;
        info!("Requesting AI judgment for {} from {}", ticker, self.model);

        let prompt = self.prompt_for(ticker, headline);
        let url = Url::parse_with_params(
            &format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model),
            &[("key", api_key)],
        )
        .map_err(|e| JudgeError::Decode(format!("invalid AI URL: {}", e)))?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(JudgeError::Status(status.as_u16(), body));
        }

        let judgment = parse_generate_response(&body)?;
        debug!("AI judgment for {}: {}", ticker, judgment);
        Ok(judgment)
    }
}

/// Concatenated text of the first candidate, trimmed. Blank text is an error.
pub fn parse_generate_response(body: &str) -> Result<String, JudgeError> {
    let data: GenerateResponse =
        serde_json::from_str(body).map_err(|e| JudgeError::Decode(e.to_string()))?;

    let text: String = data
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(JudgeError::EmptyResponse);
    }
    Ok(text.to_string())
}
