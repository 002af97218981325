use budget_assistant::{
    assistant::BudgetAssistant,
    gemini::{GeminiClient, DEFAULT_MODEL},
};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Keep the terminal quiet; only surface real problems
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    dotenv::dotenv().ok();

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  GEMINI_API_KEY not set in .env");
        String::new()
    });
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let client = GeminiClient::with_model(api_key, model);
    let mut assistant = BudgetAssistant::new();

    println!("Budget Assistant initialized. Type 'quit' to exit.");

    let stdin = io::stdin();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let message = line.trim();
        if message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            continue;
        }

        match assistant.process_message(message, &client).await {
            Ok(response) => println!("Assistant: {}", response),
            Err(e) => eprintln!("error: {}", e),
        }
    }

    Ok(())
}
