//! Chatbot dispatcher
//!
//! Sequences classifier → resolver → collaborator calls → formatter and
//! owns the failure policy: no error ever crosses `respond`. Every
//! collaborator call site is individually guarded and degrades to a
//! user-facing apology; every path returns a complete, non-empty string.

use crate::ai::AiClient;
use crate::classifier;
use crate::config::Config;
use crate::formatter;
use crate::models::{ChatRole, ChatTurn, Intent, Mode, NewsItem, PriceDetail};
use crate::providers::{
    ChartProvider, GoogleNewsClient, MarketDataProvider, NewsProvider, SvgHistoryCharts,
    YahooClient,
};
use crate::resolver;
use crate::sentiment;
use crate::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Most symbols rendered in one comparison reply.
const COMPARE_LIMIT: usize = 5;
/// Trailing window for history charts.
const HISTORY_DAYS: usize = 5;

const INVALID_INPUT_REPLY: &str =
    "I didn't receive any input. Please ask me about stocks or finance!";
const GREETING_REPLY: &str = "Hello! 👋 I'm FinTalkBot. How can I help you with stocks today?";
const SMALL_TALK_REPLY: &str = "I'm just a bot, but I'm doing great 😃. Thanks for asking!";
const COMPARE_INSTRUCTIVE_REPLY: &str =
    "Please specify at least two tickers or names to compare (e.g., 'Compare Apple and Tesla').";
const PRICE_INSTRUCTIVE_REPLY: &str =
    "Please specify a ticker symbol. For example: 'What is the price of AAPL?'";
const PRICE_MISS_REPLY: &str = "Sorry, I couldn't find that stock/crypto. Try another.";
const NEWS_EMPTY_REPLY: &str = "No finance news available at the moment. Please try again later.";
const NEWS_ERROR_REPLY: &str = "Error fetching finance news. Please try again later.";
const HISTORY_INSTRUCTIVE_REPLY: &str = "Please specify a ticker for history, e.g., 'AAPL history'.";

const AI_SYSTEM_PROMPT: &str =
    "You are FinTalkBot AI. Be concise, helpful, and accurate about finance topics.";

pub struct Chatbot {
    market: Arc<dyn MarketDataProvider>,
    news: Arc<dyn NewsProvider>,
    charts: Arc<dyn ChartProvider>,
    ai: AiClient,
    news_query: String,
}

impl Chatbot {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        news: Arc<dyn NewsProvider>,
        charts: Arc<dyn ChartProvider>,
        ai: AiClient,
        news_query: String,
    ) -> Self {
        Self {
            market,
            news,
            charts,
            ai,
            news_query,
        }
    }

    /// Wire up the default collaborators from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let market: Arc<dyn MarketDataProvider> = Arc::new(YahooClient::new(config)?);
        let news: Arc<dyn NewsProvider> = Arc::new(GoogleNewsClient::new(config)?);
        let charts: Arc<dyn ChartProvider> = Arc::new(SvgHistoryCharts::new(market.clone()));
        let ai = AiClient::new(config)?;

        Ok(Self::new(market, news, charts, ai, config.news_query.clone()))
    }

    /// Produce one reply for one raw utterance. Never fails, never empty.
    pub async fn respond(&self, input: Option<&str>) -> String {
        let trimmed = match input {
            Some(raw) => raw.trim(),
            None => return INVALID_INPUT_REPLY.to_string(),
        };
        if trimmed.is_empty() {
            return INVALID_INPUT_REPLY.to_string();
        }

        let normalized = trimmed.to_lowercase();
        let intent = classifier::classify(&normalized);
        info!(?intent, "Classified utterance");

        match intent {
            Intent::Greeting => GREETING_REPLY.to_string(),
            Intent::SmallTalk => SMALL_TALK_REPLY.to_string(),
            Intent::Help | Intent::StockGeneric => formatter::format_help(),
            Intent::Compare => self.handle_compare(trimmed).await,
            Intent::Price => self.handle_price(trimmed).await,
            Intent::News => self.handle_news().await,
            Intent::History => self.handle_history(trimmed).await,
            Intent::Fallback => format!(
                "Sorry, I don't know that yet. Try asking about price, news, or history, \
                 e.g., 'price of AAPL' or 'Tesla news'.\n{}",
                formatter::format_help()
            ),
        }
    }

    /// Reply in the requested mode. `Rules` runs the deterministic engine;
    /// `Ai` delegates to the configured LLM with caller-owned history.
    pub async fn respond_with_mode(
        &self,
        input: Option<&str>,
        mode: Mode,
        history: &[ChatTurn],
    ) -> String {
        match mode {
            Mode::Rules => self.respond(input).await,
            Mode::Ai => {
                let trimmed = input.map(str::trim).unwrap_or_default();
                if trimmed.is_empty() {
                    return INVALID_INPUT_REPLY.to_string();
                }

                let mut messages = Vec::with_capacity(history.len() + 2);
                messages.push(ChatTurn::new(ChatRole::System, AI_SYSTEM_PROMPT));
                messages.extend_from_slice(history);
                messages.push(ChatTurn::new(ChatRole::User, trimmed));

                match self.ai.generate(&messages).await {
                    Ok(reply) => reply,
                    Err(e) => {
                        warn!("AI delegation failed: {}", e);
                        format!("AI error: {}", e)
                    }
                }
            }
        }
    }

    async fn handle_compare(&self, text: &str) -> String {
        let symbols = resolver::resolve_all(text);
        if symbols.len() < 2 {
            return COMPARE_INSTRUCTIVE_REPLY.to_string();
        }

        let mut rows: Vec<(String, Option<PriceDetail>)> = Vec::new();
        for symbol in symbols.into_iter().take(COMPARE_LIMIT) {
            // One failing entry must not abort the rest
            let detail = match self.market.price_detail(&symbol).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!(symbol = %symbol, "Price lookup failed during comparison: {}", e);
                    None
                }
            };
            rows.push((symbol, detail));
        }
        formatter::format_comparison(&rows)
    }

    async fn handle_price(&self, text: &str) -> String {
        let Some(symbol) = resolver::resolve_primary(text) else {
            return PRICE_INSTRUCTIVE_REPLY.to_string();
        };

        match self.market.price_detail(&symbol).await {
            Ok(Some(detail)) => formatter::format_price(
                &symbol,
                detail.price,
                detail.currency.as_deref(),
                detail.change_percent,
            ),
            Ok(None) => PRICE_MISS_REPLY.to_string(),
            Err(e) => {
                warn!(symbol = %symbol, "Price lookup failed: {}", e);
                format!(
                    "Error fetching stock price for {}. Please try again later.",
                    symbol
                )
            }
        }
    }

    async fn handle_news(&self) -> String {
        match self.news.headlines(&self.news_query).await {
            Ok(headlines) if headlines.is_empty() => NEWS_EMPTY_REPLY.to_string(),
            Ok(headlines) => {
                let items: Vec<NewsItem> = headlines
                    .into_iter()
                    .map(|headline| NewsItem {
                        sentiment: sentiment::analyze(&headline),
                        headline,
                    })
                    .collect();
                formatter::format_news(&items)
            }
            Err(e) => {
                warn!("News fetch failed: {}", e);
                NEWS_ERROR_REPLY.to_string()
            }
        }
    }

    async fn handle_history(&self, text: &str) -> String {
        let Some(symbol) = resolver::resolve_primary(text) else {
            return HISTORY_INSTRUCTIVE_REPLY.to_string();
        };

        match self.charts.history_chart(&symbol, HISTORY_DAYS).await {
            Ok(Some(payload)) => format!(
                "📉 {} - Last {} days\n[chart: data:image/svg+xml;base64,{}]",
                symbol, HISTORY_DAYS, payload
            ),
            Ok(None) => format!(
                "Sorry, I couldn't generate history for {}. Try again later.",
                symbol
            ),
            Err(e) => {
                warn!(symbol = %symbol, "Chart generation failed: {}", e);
                format!(
                    "Sorry, I couldn't generate history for {}. Try again later.",
                    symbol
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiProvider;
    use crate::error::BotError;
    use crate::models::PricePoint;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MockMarket {
        details: HashMap<String, PriceDetail>,
        fail: bool,
    }

    impl MockMarket {
        fn with_detail(symbol: &str, price: f64, change: Option<f64>) -> Self {
            let mut details = HashMap::new();
            details.insert(
                symbol.to_string(),
                PriceDetail {
                    symbol: symbol.to_string(),
                    price,
                    currency: Some("USD".to_string()),
                    change_percent: change,
                },
            );
            Self {
                details,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                details: HashMap::new(),
                fail: true,
            }
        }

        fn empty() -> Self {
            Self {
                details: HashMap::new(),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockMarket {
        async fn price_detail(&self, symbol: &str) -> crate::Result<Option<PriceDetail>> {
            if self.fail {
                return Err(BotError::Provider("boom".to_string()));
            }
            Ok(self.details.get(symbol).cloned())
        }

        async fn history(&self, _symbol: &str, _days: usize) -> crate::Result<Vec<PricePoint>> {
            Ok(Vec::new())
        }
    }

    struct MockNews {
        headlines: Vec<String>,
        fail: bool,
    }

    #[async_trait]
    impl NewsProvider for MockNews {
        async fn headlines(&self, _query: &str) -> crate::Result<Vec<String>> {
            if self.fail {
                return Err(BotError::Provider("feed down".to_string()));
            }
            Ok(self.headlines.clone())
        }
    }

    struct MockCharts {
        payload: Option<String>,
    }

    #[async_trait]
    impl ChartProvider for MockCharts {
        async fn history_chart(
            &self,
            _symbol: &str,
            _days: usize,
        ) -> crate::Result<Option<String>> {
            Ok(self.payload.clone())
        }
    }

    fn test_ai() -> AiClient {
        let config = Config {
            host: "0.0.0.0".into(),
            port: 5000,
            news_query: "stock market".into(),
            request_timeout: std::time::Duration::from_secs(5),
            user_agent: "test".into(),
            ai_provider: AiProvider::OpenAi,
            openai_api_key: None,
            openai_model: "gpt-4o-mini".into(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".into(),
            database_url: None,
        };
        AiClient::new(&config).expect("ai client")
    }

    fn make_bot(market: MockMarket, news: MockNews, charts: MockCharts) -> Chatbot {
        Chatbot::new(
            Arc::new(market),
            Arc::new(news),
            Arc::new(charts),
            test_ai(),
            "stock market".to_string(),
        )
    }

    fn default_bot() -> Chatbot {
        make_bot(
            MockMarket::empty(),
            MockNews {
                headlines: Vec::new(),
                fail: false,
            },
            MockCharts { payload: None },
        )
    }

    #[tokio::test]
    async fn empty_and_missing_input_share_one_apology() {
        let bot = default_bot();
        let missing = bot.respond(None).await;
        let empty = bot.respond(Some("")).await;
        let blank = bot.respond(Some("   ")).await;
        assert_eq!(missing, INVALID_INPUT_REPLY);
        assert_eq!(missing, empty);
        assert_eq!(missing, blank);
    }

    #[tokio::test]
    async fn greeting_is_fixed_regardless_of_trailing_content() {
        let bot = default_bot();
        for input in ["Hello", "hi, price of AAPL please", "HEY you"] {
            assert_eq!(bot.respond(Some(input)).await, GREETING_REPLY);
        }
    }

    #[tokio::test]
    async fn small_talk_and_help() {
        let bot = default_bot();
        assert_eq!(bot.respond(Some("how are you?")).await, SMALL_TALK_REPLY);
        assert_eq!(bot.respond(Some("/help")).await, formatter::format_help());
        assert_eq!(
            bot.respond(Some("tell me about stocks")).await,
            formatter::format_help()
        );
    }

    #[tokio::test]
    async fn compare_needs_two_symbols() {
        let bot = default_bot();
        assert_eq!(
            bot.respond(Some("Compare AAPL")).await,
            COMPARE_INSTRUCTIVE_REPLY
        );
    }

    #[tokio::test]
    async fn compare_tolerates_individual_misses() {
        let bot = make_bot(
            MockMarket::with_detail("AAPL", 150.25, Some(1.23)),
            MockNews {
                headlines: Vec::new(),
                fail: false,
            },
            MockCharts { payload: None },
        );
        let reply = bot.respond(Some("Compare AAPL and MSFT")).await;
        assert!(reply.starts_with("🔁 Comparison:"));
        assert!(reply.contains("AAPL | Price: USD $150.25"));
        assert!(reply.contains("- MSFT: Not found or unavailable"));
    }

    #[tokio::test]
    async fn price_happy_path() {
        let bot = make_bot(
            MockMarket::with_detail("AAPL", 150.25, Some(1.23)),
            MockNews {
                headlines: Vec::new(),
                fail: false,
            },
            MockCharts { payload: None },
        );
        let reply = bot.respond(Some("What is the price of AAPL?")).await;
        assert!(reply.contains("📈 AAPL"));
        assert!(reply.contains("$150.25"));
        assert!(reply.contains("▲ +1.23%"));
    }

    #[tokio::test]
    async fn price_without_symbol_is_instructive() {
        let bot = default_bot();
        assert_eq!(
            bot.respond(Some("what is the price")).await,
            PRICE_INSTRUCTIVE_REPLY
        );
    }

    #[tokio::test]
    async fn price_miss_and_failure_never_propagate() {
        let bot = default_bot();
        assert_eq!(bot.respond(Some("price of ZZZZ")).await, PRICE_MISS_REPLY);

        let failing = bot_with_failing_market();
        let reply = failing.respond(Some("price of AAPL")).await;
        assert!(reply.contains("AAPL"));
        assert!(reply.contains("Error fetching stock price"));
    }

    fn bot_with_failing_market() -> Chatbot {
        make_bot(
            MockMarket::failing(),
            MockNews {
                headlines: Vec::new(),
                fail: false,
            },
            MockCharts { payload: None },
        )
    }

    #[tokio::test]
    async fn news_renders_sentiment_labels() {
        let bot = make_bot(
            MockMarket::empty(),
            MockNews {
                headlines: vec![
                    "Markets surge on strong profits".to_string(),
                    "Recession fears deepen".to_string(),
                ],
                fail: false,
            },
            MockCharts { payload: None },
        );
        let reply = bot.respond(Some("any news?")).await;
        assert!(reply.contains("1. Markets surge on strong profits"));
        assert!(reply.contains("Sentiment: Positive"));
        assert!(reply.contains("2. Recession fears deepen"));
        assert!(reply.contains("Sentiment: Negative"));
    }

    #[tokio::test]
    async fn news_empty_and_failure_replies() {
        let bot = default_bot();
        assert_eq!(bot.respond(Some("news please")).await, NEWS_EMPTY_REPLY);

        let failing = make_bot(
            MockMarket::empty(),
            MockNews {
                headlines: Vec::new(),
                fail: true,
            },
            MockCharts { payload: None },
        );
        assert_eq!(failing.respond(Some("news please")).await, NEWS_ERROR_REPLY);
    }

    #[tokio::test]
    async fn history_handler_embeds_chart_payload() {
        let bot = make_bot(
            MockMarket::empty(),
            MockNews {
                headlines: Vec::new(),
                fail: false,
            },
            MockCharts {
                payload: Some("QUJD".to_string()),
            },
        );
        let reply = bot.handle_history("AAPL history").await;
        assert!(reply.starts_with("📉 AAPL - Last 5 days"));
        assert!(reply.contains("data:image/svg+xml;base64,QUJD"));
    }

    #[tokio::test]
    async fn history_miss_names_the_symbol() {
        let bot = default_bot();
        let reply = bot.handle_history("TSLA history").await;
        assert_eq!(
            reply,
            "Sorry, I couldn't generate history for TSLA. Try again later."
        );
        assert_eq!(
            bot.handle_history("what happened").await,
            HISTORY_INSTRUCTIVE_REPLY
        );
    }

    #[tokio::test]
    async fn fallback_always_shows_capabilities() {
        let bot = default_bot();
        let reply = bot.respond(Some("random nonsense xyz")).await;
        assert!(reply.starts_with("Sorry, I don't know that yet."));
        assert!(reply.contains(&formatter::format_help()));
    }

    #[tokio::test]
    async fn identical_inputs_yield_identical_replies() {
        let bot = make_bot(
            MockMarket::with_detail("AAPL", 150.25, Some(1.23)),
            MockNews {
                headlines: Vec::new(),
                fail: false,
            },
            MockCharts { payload: None },
        );
        let first = bot.respond(Some("price of AAPL")).await;
        let second = bot.respond(Some("price of AAPL")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn ai_mode_without_keys_returns_guidance_not_error() {
        let bot = default_bot();
        let reply = bot
            .respond_with_mode(Some("explain RSI"), Mode::Ai, &[])
            .await;
        assert!(reply.contains("AI mode is not configured"));
    }

    #[tokio::test]
    async fn every_reply_is_non_empty() {
        let bot = default_bot();
        for input in [
            None,
            Some(""),
            Some("hello"),
            Some("compare"),
            Some("price"),
            Some("news"),
            Some("stocks?"),
            Some("gibberish"),
        ] {
            assert!(!bot.respond(input).await.is_empty());
        }
    }
}
