//! Core data models for the finance chatbot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Intent =================
//

/// Closed set of actions the dispatcher can take for one utterance.
/// Exactly one is selected per input; `Fallback` is the total-function default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    SmallTalk,
    Help,
    Compare,
    Price,
    News,
    History,
    StockGeneric,
    Fallback,
}

//
// ================= Market Data =================
//

/// Quote snapshot for one symbol. Price is required; currency and
/// day-change are best effort and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceDetail {
    pub symbol: String,
    pub price: f64,
    pub currency: Option<String>,
    pub change_percent: Option<f64>,
}

/// One point of a trailing close-price series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

//
// ================= News =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsItem {
    pub headline: String,
    pub sentiment: Sentiment,
}

//
// ================= AI-delegated mode =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        write!(f, "{}", s)
    }
}

/// One prior turn of an AI-mode conversation. Owned by the calling
/// session; the core never stores these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Reply mode toggle exposed to the calling layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Rules,
    Ai,
}
