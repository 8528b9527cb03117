use fintalk::{bot::Chatbot, config::Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    dotenv::dotenv().ok();

    info!("FinTalkBot console demo starting");

    let config = Config::from_env();
    let bot = Chatbot::from_config(&config)?;

    let test_inputs = [
        "Hello",
        "What is the price of AAPL?",
        "Show me finance news",
        "How are you?",
        "Tell me about stocks",
        "Random input",
    ];

    for input in test_inputs {
        println!("Input: {}", input);
        println!("Response: {}", bot.respond(Some(input)).await);
        println!("{}", "-".repeat(50));
    }

    Ok(())
}
