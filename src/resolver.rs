//! Entity resolver
//!
//! Extracts ticker symbols from raw utterances. Lexicon hits take
//! precedence over the pattern scanner; the lexicon pass is a plain
//! substring containment scan (not tokenized), so a name embedded inside a
//! longer word also matches. That looseness is intentional and kept.
//!
//! Pure functions of the input text and the static lexicon. No I/O.

use crate::lexicon::{self, CRYPTO_PAIRS};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 2-5 uppercase letters on word boundaries.
    static ref TICKER_RE: Regex = Regex::new(r"\b[A-Z]{2,5}\b").unwrap();
    /// Extended token runs: letters, dot, hyphen (crypto pair codes included).
    static ref TOKEN_RE: Regex = Regex::new(r"[A-Za-z][A-Za-z.\-]+").unwrap();
}

/// Resolve the single most likely symbol, or `None`.
///
/// Lexicon first (merged-table order wins), then the first left-to-right
/// uppercase run in the uppercased text that is not a stopword.
pub fn resolve_primary(text: &str) -> Option<String> {
    let lowered = text.to_lowercase();
    for (name, ticker) in lexicon::merged() {
        if lowered.contains(name) {
            return Some(ticker.to_string());
        }
    }

    let upper = text.to_uppercase();
    TICKER_RE
        .find_iter(&upper)
        .map(|m| m.as_str())
        .find(|token| !lexicon::is_stopword(token))
        .map(|token| token.to_string())
}

/// Resolve every symbol mentioned, deduplicated, first-seen order.
///
/// All lexicon hits (table order) come first, then pattern tokens that are
/// written in uppercase in the raw input: purely alphabetic runs of 2-5
/// letters outside the stopword set, plus the fixed crypto pair codes.
pub fn resolve_all(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for (name, ticker) in lexicon::merged() {
        if lowered.contains(name) {
            found.push(ticker.to_string());
        }
    }

    for raw in TOKEN_RE.find_iter(text).map(|m| m.as_str()) {
        // Sentence punctuation sticks to the token run ("MSFT.", "AAPL-")
        let token = raw.trim_end_matches(['.', '-']);
        let is_symbol_run = token.len() >= 2
            && token.len() <= 5
            && token.chars().all(|c| c.is_ascii_uppercase())
            && !lexicon::is_stopword(token);
        let upper = token.to_uppercase();
        if is_symbol_run {
            found.push(token.to_string());
        } else if CRYPTO_PAIRS.contains(&upper.as_str()) {
            found.push(upper);
        }
    }

    // Deduplicate, preserve first-seen order
    let mut seen = std::collections::HashSet::new();
    found.retain(|t| seen.insert(t.clone()));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_finds_explicit_ticker() {
        assert_eq!(resolve_primary("price of AAPL"), Some("AAPL".to_string()));
    }

    #[test]
    fn primary_prefers_lexicon_over_pattern() {
        assert_eq!(resolve_primary("Apple stock"), Some("AAPL".to_string()));
        // "TSLA" is present, but the alias scan runs first
        assert_eq!(
            resolve_primary("is apple better than TSLA"),
            Some("AAPL".to_string())
        );
    }

    #[test]
    fn primary_skips_stopwords() {
        assert_eq!(
            resolve_primary("WHAT IS THE PRICE OF NVDA"),
            Some("NVDA".to_string())
        );
        assert_eq!(resolve_primary("what is the price"), None);
    }

    #[test]
    fn primary_matches_names_inside_longer_words() {
        // Containment scan, not tokenized: documented looseness
        assert_eq!(resolve_primary("pineapples"), Some("AAPL".to_string()));
    }

    #[test]
    fn all_orders_by_lexicon_then_pattern() {
        assert_eq!(resolve_all("Compare Apple and Tesla"), vec!["AAPL", "TSLA"]);
        assert_eq!(resolve_all("Compare AAPL and MSFT"), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn all_deduplicates_preserving_first_seen() {
        assert_eq!(
            resolve_all("Compare Apple with AAPL and TSLA"),
            vec!["AAPL", "TSLA"]
        );
    }

    #[test]
    fn all_ignores_lowercase_words() {
        assert!(resolve_all("nothing to see here").is_empty());
    }

    #[test]
    fn all_recognizes_crypto_pairs() {
        assert_eq!(resolve_all("compare BTC-USD and ETH-USD"), vec!["BTC-USD", "ETH-USD"]);
        // and via alias
        assert_eq!(
            resolve_all("compare bitcoin and ethereum"),
            vec!["BTC-USD", "ETH-USD"]
        );
    }

    #[test]
    fn all_keeps_tickers_followed_by_punctuation() {
        assert_eq!(resolve_all("Compare AAPL and MSFT."), vec!["AAPL", "MSFT"]);
        assert_eq!(resolve_all("price of btc-usd."), vec!["BTC-USD"]);
    }

    #[test]
    fn all_excludes_stopwords() {
        assert_eq!(resolve_all("WHAT IS THE PRICE OF TSLA"), vec!["TSLA"]);
    }
}
