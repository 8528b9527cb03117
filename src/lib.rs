//! FinTalkBot
//!
//! A finance chatbot that:
//! - Classifies free-text utterances into a fixed set of intents
//! - Resolves colloquial names and ticker-like tokens to canonical symbols
//! - Fetches quotes, news and trailing history through narrow provider seams
//! - Renders deterministic replies and never lets an error reach the caller
//! - Optionally delegates a turn to an LLM (AI mode) with caller-owned history
//!
//! PIPELINE:
//! INPUT → NORMALIZE → CLASSIFY → RESOLVE → FETCH → FORMAT → REPLY

pub mod ai;
pub mod api;
pub mod bot;
pub mod chart;
pub mod classifier;
pub mod config;
pub mod error;
pub mod formatter;
pub mod lexicon;
pub mod models;
pub mod providers;
pub mod resolver;
pub mod sentiment;
pub mod storage;

pub use error::Result;

// Re-export common types
pub use bot::Chatbot;
pub use models::*;
