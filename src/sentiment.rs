//! Headline sentiment scorer
//!
//! Lexicon-based polarity scoring. Token valences are summed and squashed
//! into (-1, 1); the label thresholds are fixed at ±0.05. Pure, never fails.

use crate::models::Sentiment;

/// Word valences, finance-leaning. Matched on whole lowercase tokens.
const VALENCES: &[(&str, f64)] = &[
    // Positive
    ("gain", 1.8),
    ("gains", 1.8),
    ("surge", 2.2),
    ("surges", 2.2),
    ("soar", 2.4),
    ("soars", 2.4),
    ("rally", 1.9),
    ("rallies", 1.9),
    ("record", 1.2),
    ("profit", 1.7),
    ("profits", 1.7),
    ("growth", 1.5),
    ("beat", 1.4),
    ("beats", 1.4),
    ("strong", 1.5),
    ("bullish", 2.0),
    ("upgrade", 1.6),
    ("optimism", 1.8),
    ("boom", 2.0),
    ("win", 1.6),
    ("wins", 1.6),
    ("good", 1.3),
    ("great", 1.9),
    ("higher", 1.1),
    ("rise", 1.3),
    ("rises", 1.3),
    ("rebound", 1.5),
    // Negative
    ("loss", -1.8),
    ("losses", -1.8),
    ("drop", -1.5),
    ("drops", -1.5),
    ("fall", -1.4),
    ("falls", -1.4),
    ("plunge", -2.3),
    ("plunges", -2.3),
    ("crash", -2.6),
    ("crashes", -2.6),
    ("slump", -2.0),
    ("weak", -1.4),
    ("bearish", -2.0),
    ("downgrade", -1.6),
    ("fear", -1.7),
    ("fears", -1.7),
    ("recession", -2.2),
    ("miss", -1.3),
    ("misses", -1.3),
    ("cut", -1.1),
    ("cuts", -1.1),
    ("bad", -1.5),
    ("worse", -1.8),
    ("lower", -1.1),
    ("decline", -1.4),
    ("declines", -1.4),
    ("layoffs", -2.0),
    ("fraud", -2.8),
];

/// Normalization constant: keeps the compound score inside (-1, 1).
const NORM_ALPHA: f64 = 15.0;

/// Compound polarity score in (-1, 1). Zero for text with no scored tokens.
pub fn polarity_score(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let sum: f64 = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            VALENCES
                .iter()
                .find(|(word, _)| *word == token)
                .map(|(_, valence)| *valence)
        })
        .sum();

    if sum == 0.0 {
        return 0.0;
    }
    sum / (sum * sum + NORM_ALPHA).sqrt()
}

/// Label a headline: Positive above 0.05, Negative below -0.05, else Neutral.
pub fn analyze(text: &str) -> Sentiment {
    let score = polarity_score(text);
    if score > 0.05 {
        Sentiment::Positive
    } else if score < -0.05 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
