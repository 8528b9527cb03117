//! Google News headline fetcher
//!
//! Pulls the RSS search feed for the configured query and extracts item
//! titles. Deduplicated and capped at five before returning.

use crate::config::Config;
use crate::error::BotError;
use crate::providers::NewsProvider;
use crate::Result;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const FEED_URL: &str = "https://news.google.com/rss/search";
const HEADLINE_LIMIT: usize = 5;

lazy_static! {
    static ref TITLE_RE: Regex =
        Regex::new(r"<title>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</title>").unwrap();
}

pub struct GoogleNewsClient {
    client: Client,
    feed_url: String,
}

impl GoogleNewsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            feed_url: FEED_URL.to_string(),
        })
    }
}

#[async_trait]
impl NewsProvider for GoogleNewsClient {
    async fn headlines(&self, query: &str) -> Result<Vec<String>> {
        debug!(query, "Fetching news feed");

        let response = self
            .client
            .get(&self.feed_url)
            .query(&[("q", query)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BotError::Provider(format!(
                "News feed returned {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        Ok(extract_headlines(&body))
    }
}

/// Pull item titles out of an RSS body. The first `<title>` is the channel
/// title and is skipped; duplicates are dropped, output capped at five.
fn extract_headlines(body: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    TITLE_RE
        .captures_iter(body)
        .skip(1)
        .filter_map(|cap| {
            let title = cap.get(1)?.as_str().trim();
            if title.is_empty() {
                return None;
            }
            Some(title.to_string())
        })
        .filter(|title| seen.insert(title.clone()))
        .take(HEADLINE_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
        <rss><channel>
        <title>Google News - stock market</title>
        <item><title>Markets rally on earnings beat</title></item>
        <item><title><![CDATA[Fed holds rates steady]]></title></item>
        <item><title>Markets rally on earnings beat</title></item>
        <item><title>Oil prices slip</title></item>
        <item><title>Tech IPO surges on debut</title></item>
        <item><title>Retail sales flat</title></item>
        <item><title>Bond yields edge higher</title></item>
        </channel></rss>"#;

    #[test]
    fn skips_channel_title_and_dedupes() {
        let headlines = extract_headlines(FEED);
        assert_eq!(headlines[0], "Markets rally on earnings beat");
        assert_eq!(headlines[1], "Fed holds rates steady");
        assert!(!headlines.iter().any(|h| h.contains("Google News")));
        // the duplicate rally headline counted once
        assert_eq!(
            headlines
                .iter()
                .filter(|h| h.contains("rally"))
                .count(),
            1
        );
    }

    #[test]
    fn caps_at_five() {
        assert_eq!(extract_headlines(FEED).len(), 5);
    }

    #[test]
    fn empty_body_yields_no_headlines() {
        assert!(extract_headlines("").is_empty());
    }
}
