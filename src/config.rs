//! Environment-backed configuration
//!
//! All knobs come from the environment (optionally via a .env file).
//! Loaded once at startup and shared read-only.

use std::env;
use std::time::Duration;

/// Which backend answers AI-delegated turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    OpenAi,
    Gemini,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,

    // Data fetching
    pub news_query: String,
    pub request_timeout: Duration,
    pub user_agent: String,

    // AI-delegated mode
    pub ai_provider: AiProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,

    // Chat log persistence (falls back to in-memory when unset)
    pub database_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let ai_provider = match env::var("AI_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .to_lowercase()
            .as_str()
        {
            "gemini" => AiProvider::Gemini,
            _ => AiProvider::OpenAi,
        };

        let timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .or_else(|_| env::var("API_PORT"))
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            news_query: env::var("NEWS_QUERY").unwrap_or_else(|_| "stock market".to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| "FinTalkBot/1.0 (+https://example.com) reqwest".to_string()),
            ai_provider,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            database_url: env::var("POSTGRES_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .ok(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
