//! Static symbol lexicon
//!
//! Colloquial names mapped to canonical tickers, plus the stopword set the
//! pattern scanner must never treat as a symbol. Process-wide, read-only,
//! fixed at compile time.

/// Common aliases — checked first. Order matters: the first phrase found
/// during a left-to-right scan over the merged table wins.
pub const ALIASES: &[(&str, &str)] = &[
    ("apple", "AAPL"),
    ("tesla", "TSLA"),
    ("bitcoin", "BTC-USD"),
    ("ethereum", "ETH-USD"),
];

/// Extended known names — merged after the aliases.
pub const KNOWN_NAMES: &[(&str, &str)] = &[
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("amazon", "AMZN"),
    ("meta", "META"),
    ("facebook", "META"),
    ("nvidia", "NVDA"),
];

/// Uppercase words that match the ticker pattern but are never symbols.
pub const STOPWORDS: &[&str] = &["PRICE", "STOCK", "NEWS", "WHAT", "THE", "OF", "IS", "FOR"];

/// Hyphenated asset codes the resolver recognizes verbatim.
pub const CRYPTO_PAIRS: &[&str] = &["BTC-USD", "ETH-USD"];

/// Iterate the merged table in precedence order (aliases before known names).
pub fn merged() -> impl Iterator<Item = (&'static str, &'static str)> {
    ALIASES.iter().chain(KNOWN_NAMES.iter()).copied()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_come_before_known_names() {
        let first: Vec<&str> = merged().take(ALIASES.len()).map(|(name, _)| name).collect();
        assert_eq!(first, vec!["apple", "tesla", "bitcoin", "ethereum"]);
    }

    #[test]
    fn stopwords_are_uppercase() {
        for word in STOPWORDS {
            assert_eq!(*word, word.to_uppercase());
            assert!(is_stopword(word));
        }
    }
}
