//! stockwatch - stock watch list with price snapshots and AI sentiment
//!
//! This library provides the price snapshot engine (current close plus the
//! change against 5, 10 and 30 calendar days ago) and the collaborators that
//! turn it into a mailed per-ticker report: market data, news, an AI
//! sentiment judge, a notifier and the persistent ticker registry.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod dispatcher;
pub mod error;
pub mod news;
pub mod notify;
pub mod pricing;
pub mod reports;
pub mod sentiment;
pub mod tickers;
pub mod ui;
pub mod utils;
