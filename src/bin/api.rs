use budget_assistant::{
    api::{start_server, ApiState},
    gemini::{GeminiClient, DEFAULT_MODEL},
    session::SessionRegistry,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budget_assistant=info,tower_http=info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_else(|_| {
        eprintln!("⚠️  GEMINI_API_KEY not set in .env");
        eprintln!("📌 See .env.example for setup instructions");
        String::new()
    });

    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    info!("🚀 Budget Assistant - API Server");
    info!("📍 Port: {}", port);
    info!("🤖 Model: {}", model);

    let state = ApiState {
        sessions: SessionRegistry::new(),
        generator: Arc::new(GeminiClient::with_model(api_key, model)),
    };

    info!("✅ Assistant initialized");
    info!("📡 Starting API server...");

    start_server(state, port).await
}
