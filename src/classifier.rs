//! Intent classifier
//!
//! Maps a normalized (lowercased, trimmed) utterance to exactly one intent
//! via ordered substring predicates. The first matching branch wins, no
//! matter how many later ones would also match; substring false positives
//! are accepted, documented behavior.

use crate::models::Intent;

/// Static phrase lists — zero allocation
const GREETINGS: &[&str] = &["hello", "hi", "hey", "good morning", "good afternoon"];

/// Classify one normalized utterance. Total: always returns an intent.
pub fn classify(normalized: &str) -> Intent {
    if GREETINGS.iter().any(|g| normalized.contains(g)) {
        Intent::Greeting
    } else if normalized.contains("how are you") {
        Intent::SmallTalk
    } else if normalized.starts_with("/help")
        || normalized.contains("what can you do")
        || normalized == "help"
    {
        Intent::Help
    } else if normalized.contains("compare") {
        Intent::Compare
    } else if normalized.contains("price") {
        Intent::Price
    } else if normalized.contains("news") {
        Intent::News
    } else if normalized.contains("history") {
        Intent::History
    } else if normalized.contains("stock") {
        Intent::StockGeneric
    } else {
        Intent::Fallback
    }
}
