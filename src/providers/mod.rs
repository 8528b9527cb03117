//! External collaborator contracts
//!
//! Narrow seams the dispatcher calls through. A legitimate "nothing found"
//! is an `Ok(None)` / empty vec miss, distinct from an `Err`; timeouts and
//! retries live behind these traits, never in the core.

use crate::chart;
use crate::models::{PriceDetail, PricePoint};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub mod news;
pub mod yahoo;

pub use news::GoogleNewsClient;
pub use yahoo::YahooClient;

/// Quote and trailing-history source.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Price plus best-effort currency and day change. `None` is a miss.
    async fn price_detail(&self, symbol: &str) -> Result<Option<PriceDetail>>;

    /// Close prices for the trailing `days` window, oldest first.
    async fn history(&self, symbol: &str, days: usize) -> Result<Vec<PricePoint>>;
}

/// Headline source. Capped and deduplicated before returning.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn headlines(&self, query: &str) -> Result<Vec<String>>;
}

/// Chart generator: encoded image payload for a trailing window, or a miss.
#[async_trait]
pub trait ChartProvider: Send + Sync {
    async fn history_chart(&self, symbol: &str, days: usize) -> Result<Option<String>>;
}

/// Default chart provider: market history rendered as an inline SVG.
pub struct SvgHistoryCharts {
    market: Arc<dyn MarketDataProvider>,
}

impl SvgHistoryCharts {
    pub fn new(market: Arc<dyn MarketDataProvider>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl ChartProvider for SvgHistoryCharts {
    async fn history_chart(&self, symbol: &str, days: usize) -> Result<Option<String>> {
        let points = self.market.history(symbol, days).await?;
        Ok(chart::render_history_chart(symbol, &points))
    }
}
