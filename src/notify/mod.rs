//! Report delivery.

pub mod smtp;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::NotifyError;
use crate::tickers::Ticker;
use crate::utils::truncate_chars;

pub use smtp::SmtpNotifier;

/// Characters of the judgment carried into the subject line.
const SUBJECT_JUDGMENT_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Consolidated per-ticker summary.
    pub fn for_ticker(ticker: &Ticker, judgment: &str, price_report: &str, headline: &str) -> Self {
        let subject = format!(
            "ANALYSIS: {} {}",
            ticker,
            truncate_chars(judgment, SUBJECT_JUDGMENT_CHARS)
        );
        let body = format!(
            "AI JUDGMENT: {}\n\nPRICE PERFORMANCE:\n{}\n\nLATEST NEWS:\n{}",
            judgment, price_report, headline
        );
        Self {
            subject: subject.trim_end().to_string(),
            body,
        }
    }
}

/// Delivers a notification to a fixed recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}
