//! Yahoo Finance market data client
//!
//! Quotes and trailing close series via the public v8 chart endpoint.
//! Uses a long-lived reqwest::Client for connection pooling; unknown
//! symbols come back as misses, not errors.

use crate::config::Config;
use crate::error::BotError;
use crate::models::{PriceDetail, PricePoint};
use crate::providers::MarketDataProvider;
use crate::Result;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .pool_idle_timeout(Duration::from_secs(60))
            .pool_max_idle_per_host(8)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    async fn fetch_chart(&self, symbol: &str, range: &str) -> Result<Option<ChartResult>> {
        let url = format!("{}/{}", self.base_url, symbol);

        debug!(symbol, range, "Fetching Yahoo chart data");

        let response = self
            .client
            .get(&url)
            .query(&[("range", range), ("interval", "1d")])
            .send()
            .await?;

        // Unknown symbols return 404 with an error body: a miss, not a failure
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BotError::Provider(format!(
                "Yahoo chart endpoint returned {} for {}",
                response.status(),
                symbol
            )));
        }

        let body: ChartResponse = response.json().await?;
        if let Some(error) = body.chart.error {
            warn!(symbol, ?error, "Yahoo chart error payload");
            return Ok(None);
        }

        Ok(body.chart.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }))
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn price_detail(&self, symbol: &str) -> Result<Option<PriceDetail>> {
        let Some(result) = self.fetch_chart(symbol, "1d").await? else {
            return Ok(None);
        };

        let closes = result.closes();

        // Regular market price, falling back to the last close
        let price = result
            .meta
            .regular_market_price
            .or_else(|| closes.last().copied());
        let Some(price) = price else {
            return Ok(None);
        };

        let change_percent = result
            .meta
            .chart_previous_close
            .filter(|prev| *prev != 0.0)
            .map(|prev| (price - prev) / prev * 100.0);

        Ok(Some(PriceDetail {
            symbol: symbol.to_string(),
            price,
            currency: result.meta.currency,
            change_percent,
        }))
    }

    async fn history(&self, symbol: &str, days: usize) -> Result<Vec<PricePoint>> {
        // Fetch extra calendar days so `days` market days survive weekends
        let range = format!("{}d", (days * 2).max(7));
        let Some(result) = self.fetch_chart(symbol, &range).await? else {
            return Ok(Vec::new());
        };

        let timestamps = result.timestamp.unwrap_or_default();
        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .and_then(|q| q.close)
            .unwrap_or_default();

        let mut points: Vec<PricePoint> = timestamps
            .into_iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = close?;
                let timestamp = Utc.timestamp_opt(ts, 0).single()?;
                Some(PricePoint { timestamp, close })
            })
            .collect();

        if points.len() > days {
            points.drain(..points.len() - days);
        }
        Ok(points)
    }
}

//
// ================= Wire format =================
//

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

impl ChartResult {
    fn closes(&self) -> Vec<f64> {
        self.indicators
            .quote
            .first()
            .and_then(|q| q.close.as_ref())
            .map(|closes| closes.iter().flatten().copied().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Meta {
    currency: Option<String>,
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose")]
    chart_previous_close: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}
