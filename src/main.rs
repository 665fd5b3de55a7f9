mod api;
mod chart;
mod error;
mod instagram;
mod llm;
mod normalize;
mod pipeline;
mod preprocess;
mod sentiment;

use std::env;
use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use tower_http::{cors::CorsLayer, services::ServeDir};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::AppState;
use crate::llm::{GeminiClient, GroqClient, DEFAULT_GEMINI_MODEL, DEFAULT_GROQ_MODEL};
use crate::sentiment::SentimentAnalyzer;

#[derive(OpenApi)]
#[openapi(
    paths(api::analyze_text, api::analyze_insta, api::health),
    components(
        schemas(
            api::TextAnalysisRequest,
            api::TextAnalysisResponse,
            api::ScoreBreakdown,
            api::InstaAnalysisRequest,
            api::InstaAnalysisResponse,
            api::HealthResponse,
        )
    ),
    tags(
        (name = "analysis", description = "Sentiment analysis endpoints"),
        (name = "service", description = "Service status")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let gemini_key = env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
    let groq_key = env::var("GROQ_API_KEY").context("GROQ_API_KEY must be set")?;
    let gemini_model =
        env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
    let groq_model = env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_GROQ_MODEL.to_string());
    let instagram_base_url = env::var("INSTAGRAM_BASE_URL")
        .unwrap_or_else(|_| api::DEFAULT_INSTAGRAM_BASE_URL.to_string());

    let http = reqwest::Client::new();
    let state = Arc::new(AppState {
        analyzer: SentimentAnalyzer::new(),
        rewriter: Arc::new(GeminiClient::new(http.clone(), gemini_key, gemini_model)),
        interpreter: Arc::new(GroqClient::new(http.clone(), groq_key, groq_model)),
        http,
        instagram_base_url,
    });

    let app = api::router(state)
        .merge(
            SwaggerUi::new("/insta-pulse-swagger")
                .url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .fallback_service(ServeDir::new("static")); // Serve Dashboard

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
