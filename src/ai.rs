//! AI-delegated reply client
//!
//! Direct LLM integration for the delegated chat mode. The provider is
//! chosen by configuration (OpenAI-compatible chat completions or Gemini
//! generateContent); conversation history is caller-owned and passed in per
//! call. Uses a long-lived reqwest::Client for connection pooling.

use crate::config::{AiProvider, Config};
use crate::error::BotError;
use crate::models::{ChatRole, ChatTurn};
use crate::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 500;

pub struct AiClient {
    client: Client,
    provider: AiProvider,
    openai_api_key: Option<String>,
    openai_model: String,
    gemini_api_key: Option<String>,
    gemini_model: String,
    openai_url: String,
    gemini_url: String,
}

impl AiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            provider: config.ai_provider,
            openai_api_key: config.openai_api_key.clone(),
            openai_model: config.openai_model.clone(),
            gemini_api_key: config.gemini_api_key.clone(),
            gemini_model: config.gemini_model.clone(),
            openai_url: OPENAI_URL.to_string(),
            gemini_url: GEMINI_URL.to_string(),
        })
    }

    /// Generate one assistant reply from the given turns.
    /// An unconfigured provider yields a fixed guidance reply, not an error.
    pub async fn generate(&self, messages: &[ChatTurn]) -> Result<String> {
        match self.provider {
            AiProvider::OpenAi => self.generate_openai(messages).await,
            AiProvider::Gemini => self.generate_gemini(messages).await,
        }
    }

    async fn generate_openai(&self, messages: &[ChatTurn]) -> Result<String> {
        let Some(api_key) = self.openai_api_key.as_deref() else {
            return Ok("AI mode is not configured. Please set OPENAI_API_KEY.".to_string());
        };

        let request = OpenAiRequest {
            model: self.openai_model.clone(),
            messages: messages
                .iter()
                .map(|turn| OpenAiMessage {
                    role: turn.role.to_string(),
                    content: turn.content.clone(),
                })
                .collect(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        info!(model = %self.openai_model, "Calling OpenAI chat completions");

        let response = self
            .client
            .post(&self.openai_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "OpenAI error response: {}", body);
            return Err(BotError::Llm(format!("OpenAI returned {}: {}", status, body)));
        }

        let parsed: OpenAiResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| BotError::Llm("Empty response from OpenAI".to_string()))
    }

    async fn generate_gemini(&self, messages: &[ChatTurn]) -> Result<String> {
        let Some(api_key) = self.gemini_api_key.as_deref() else {
            return Ok("AI mode is not configured. Please set GEMINI_API_KEY.".to_string());
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.gemini_url, self.gemini_model, api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: flatten_turns(messages),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                max_output_tokens: MAX_TOKENS,
            },
        };

        info!(model = %self.gemini_model, "Calling Gemini generateContent");

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Gemini error response: {}", body);
            return Err(BotError::Llm(format!("Gemini returned {}: {}", status, body)));
        }

        let parsed: GeminiResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| BotError::Llm("Empty response from Gemini".to_string()))
    }
}

/// Flatten a turn list into one role-tagged prompt (Gemini has no native
/// multi-role transcript in this endpoint shape).
fn flatten_turns(messages: &[ChatTurn]) -> String {
    messages
        .iter()
        .map(|turn| {
            let tag = match turn.role {
                ChatRole::System => "System",
                ChatRole::User => "User",
                ChatRole::Assistant => "Assistant",
            };
            format!("{}: {}", tag, turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//
// ================= Wire formats =================
//

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiReply,
}

#[derive(Debug, Deserialize)]
struct OpenAiReply {
    content: String,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}
