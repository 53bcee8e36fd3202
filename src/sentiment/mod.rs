//! AI sentiment judgments for a ticker headline.

pub mod gemini;

use async_trait::async_trait;

use crate::error::JudgeError;
use crate::tickers::Ticker;

pub use gemini::GeminiJudge;

/// Display text when no judgment could be obtained. Never returned by a judge.
pub const NEUTRAL_PLACEHOLDER: &str = "⚪ NEUTRAL";

/// Filing context used when no specific SEC filing is being reviewed.
pub const STANDARD_REVIEW: &str = "Standard Review";

/// Produces a short natural-language judgment for a headline.
#[async_trait]
pub trait SentimentJudge: Send + Sync {
    async fn judge(&self, ticker: &Ticker, headline: &str) -> Result<String, JudgeError>;
}

/// Plain-English meaning of common SEC form types.
pub fn describe_sec_form(form: &str) -> Option<&'static str> {
    match form.trim().to_uppercase().as_str() {
        "4" => Some("Insider Trading"),
        "8-K" => Some("Material Event"),
        "10-Q" => Some("Quarterly Report"),
        "10-K" => Some("Annual Report"),
        "SC 13G" => Some("Ownership Change"),
        "S-1" => Some("IPO/Registration"),
        _ => None,
    }
}

/// Filing context text for a form type: "8-K (Material Event)", or the form
/// as given when unknown.
pub fn filing_context(form: &str) -> String {
    let form = form.trim();
    match describe_sec_form(form) {
        Some(meaning) => format!("{} ({})", form.to_uppercase(), meaning),
        None => form.to_string(),
    }
}

/// Prompt sent to the model.
pub fn build_prompt(ticker: &Ticker, headline: &str, filing: &str) -> String {
    format!(
        "Analyze {}. News: {}. SEC Filing: {}. Return emoji + 5-word sentiment.",
        ticker, headline, filing
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sec_form_translation() {
        assert_eq!(describe_sec_form("8-K"), Some("Material Event"));
        assert_eq!(describe_sec_form("10-k"), Some("Annual Report"));
        assert_eq!(describe_sec_form(" SC 13G "), Some("Ownership Change"));
        assert_eq!(describe_sec_form("4"), Some("Insider Trading"));
        assert_eq!(describe_sec_form("DEF 14A"), None);
    }

    #[test]
    fn test_filing_context() {
        assert_eq!(filing_context("s-1"), "S-1 (IPO/Registration)");
        assert_eq!(filing_context(STANDARD_REVIEW), "Standard Review");
    }

    #[test]
    fn test_prompt_shape() {
        let ticker = Ticker::parse("acme").unwrap();
        assert_eq!(
            build_prompt(&ticker, "Acme beats estimates", STANDARD_REVIEW),
            "Analyze ACME. News: Acme beats estimates. SEC Filing: Standard Review. Return emoji + 5-word sentiment."
        );
    }
}
