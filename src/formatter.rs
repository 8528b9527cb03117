//! Response formatter
//!
//! Pure rendering of structured results into the stable textual contract.
//! Every function is total over its input shape; the only special case
//! anywhere is "empty input".

use crate::models::{NewsItem, PriceDetail};

/// Maximum news items rendered in one reply.
const NEWS_LIMIT: usize = 5;

/// Three-line price block: header, price, day change.
/// Currency defaults to USD; a missing change renders as an em-dash.
pub fn format_price(
    symbol: &str,
    price: f64,
    currency: Option<&str>,
    change_percent: Option<f64>,
) -> String {
    let change = match change_percent {
        Some(pct) => {
            let arrow = if pct >= 0.0 { "▲" } else { "▼" };
            format!("{} {:+.2}%", arrow, pct)
        }
        None => "—".to_string(),
    };
    format!(
        "📈 {}\nPrice: {} ${:.2}\nChange: {} today",
        symbol,
        currency.unwrap_or("USD"),
        price,
        change
    )
}

/// Single-line collapse of `format_price`, used by the comparison table.
pub fn format_price_line(
    symbol: &str,
    price: f64,
    currency: Option<&str>,
    change_percent: Option<f64>,
) -> String {
    format_price(symbol, price, currency, change_percent).replace('\n', " | ")
}

/// One line per requested symbol; misses render explicitly.
pub fn format_comparison(rows: &[(String, Option<PriceDetail>)]) -> String {
    let mut lines = vec!["🔁 Comparison:".to_string()];
    for (symbol, detail) in rows {
        match detail {
            Some(d) => lines.push(format!(
                "- {}",
                format_price_line(symbol, d.price, d.currency.as_deref(), d.change_percent)
            )),
            None => lines.push(format!("- {}: Not found or unavailable", symbol)),
        }
    }
    lines.join("\n")
}

/// Numbered headline list (1-based, capped at five) with sentiment labels.
pub fn format_news(items: &[NewsItem]) -> String {
    if items.is_empty() {
        return "No news available at the moment.".to_string();
    }

    let mut lines = vec!["Here are the latest finance news with sentiment analysis:\n".to_string()];
    for (i, item) in items.iter().take(NEWS_LIMIT).enumerate() {
        lines.push(format!("{}. {}", i + 1, item.headline));
        lines.push(format!("   Sentiment: {}\n", item.sentiment));
    }
    lines.join("\n")
}

/// Static capability summary. Byte-identical across calls.
pub fn format_help() -> String {
    concat!(
        "Here's what I can do:\n",
        "• Price: 'price of AAPL' or 'What's the price of Apple?'\n",
        "• News: 'Tesla news'\n",
        "• History: 'AAPL history' (last 5 days, with chart)\n",
        "• Compare: 'Compare Apple and Tesla'\n",
        "• Help: '/help' or 'what can you do'"
    )
    .to_string()
}
