use fintalk::{api::start_server, bot::Chatbot, config::Config, storage::ChatLog};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env();

    info!("🚀 FinTalkBot - API Server");
    info!("📍 Port: {}", config.port);

    let bot = Arc::new(Chatbot::from_config(&config)?);
    let chat_log = Arc::new(ChatLog::new(&config));

    info!("✅ Chatbot initialized");
    info!("📡 Starting API server...");

    start_server(bot, chat_log, &config.host, config.port).await?;

    Ok(())
}
