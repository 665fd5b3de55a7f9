//! HTTP layer: request/response types and the two analysis handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::chart;
use crate::error::AnalysisError;
use crate::instagram::InstagramSession;
use crate::llm::LanguageModel;
use crate::pipeline::{self, DEFAULT_COMMENT_LIMIT};
use crate::preprocess;
use crate::sentiment::SentimentAnalyzer;

pub const DEFAULT_INSTAGRAM_BASE_URL: &str = "https://www.instagram.com";

/// Everything a request needs, constructed once at startup and shared.
pub struct AppState {
    pub analyzer: SentimentAnalyzer,
    pub rewriter: Arc<dyn LanguageModel>,
    pub interpreter: Arc<dyn LanguageModel>,
    pub http: reqwest::Client,
    pub instagram_base_url: String,
}

/// The JSON API routes; Swagger UI and the static dashboard are layered on
/// in `main`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/text-analysis", post(analyze_text))
        .route("/api/insta-analysis", post(analyze_insta))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TextAnalysisRequest {
    #[serde(default)]
    pub text: String,
}

/// Percent-formatted proportions plus the raw compound, the exact shape the
/// dashboard consumes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ScoreBreakdown {
    pub neutral: String,
    pub positive: String,
    pub negative: String,
    pub compound: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TextAnalysisResponse {
    pub scores: ScoreBreakdown,
    pub plot: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstaAnalysisRequest {
    pub session_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub post_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstaAnalysisResponse {
    pub caption: String,
    pub avg_compound_score: f64,
    pub interpretation: String,
    pub plot: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "service",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

#[utoipa::path(
    post,
    path = "/api/text-analysis",
    tag = "analysis",
    request_body = TextAnalysisRequest,
    responses(
        (status = 200, description = "Sentiment breakdown with chart", body = TextAnalysisResponse),
        (status = 400, description = "Missing or empty text"),
    )
)]
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextAnalysisRequest>,
) -> Result<Json<TextAnalysisResponse>, AnalysisError> {
    if req.text.trim().is_empty() {
        return Err(AnalysisError::input("Text is required".to_string()));
    }

    // this path, and only this path, preprocesses before scoring
    let prepared = preprocess::prepare_for_scoring(&req.text);
    let scores = state.analyzer.polarity_scores(&prepared);

    let positive = scores.pos * 100.0;
    let neutral = scores.neu * 100.0;
    let negative = scores.neg * 100.0;
    let plot = chart::breakdown_svg(positive, neutral, negative);

    Ok(Json(TextAnalysisResponse {
        scores: ScoreBreakdown {
            neutral: format!("{neutral:.2}%"),
            positive: format!("{positive:.2}%"),
            negative: format!("{negative:.2}%"),
            compound: scores.compound,
        },
        plot,
    }))
}

#[utoipa::path(
    post,
    path = "/api/insta-analysis",
    tag = "analysis",
    request_body = InstaAnalysisRequest,
    responses(
        (status = 200, description = "Audience mood report", body = InstaAnalysisResponse),
        (status = 400, description = "Missing credentials or post URL"),
        (status = 500, description = "Upstream or data failure"),
    )
)]
pub async fn analyze_insta(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InstaAnalysisRequest>,
) -> Result<Json<InstaAnalysisResponse>, AnalysisError> {
    let post_url = req
        .post_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            AnalysisError::input("Authentication details and post URL are required".to_string())
        })?;

    let session = match (&req.session_id, &req.username, &req.password) {
        (Some(sid), _, _) if !sid.trim().is_empty() => InstagramSession::with_base_url(
            state.http.clone(),
            sid.clone(),
            state.instagram_base_url.clone(),
        ),
        (_, Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
            InstagramSession::login_with_base_url(
                state.http.clone(),
                user,
                pass,
                state.instagram_base_url.clone(),
            )
            .await?
        }
        _ => {
            return Err(AnalysisError::input(
                "Authentication details and post URL are required".to_string(),
            ))
        }
    };

    let request_id = Uuid::new_v4();
    info!(%request_id, url = %post_url, "instagram analysis accepted");

    let report = pipeline::analyze_post(
        &session,
        state.rewriter.as_ref(),
        state.interpreter.as_ref(),
        &state.analyzer,
        &post_url,
        DEFAULT_COMMENT_LIMIT,
    )
    .await?;

    let plot = chart::distribution_svg(&report.statement_scores);
    Ok(Json(InstaAnalysisResponse {
        caption: report.caption,
        avg_compound_score: report.avg_compound_score,
        interpretation: report.interpretation,
        plot,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct ScriptedModel(String);

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, _prompt: &str) -> Result<String, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    fn test_state(instagram_base_url: &str) -> Arc<AppState> {
        Arc::new(AppState {
            analyzer: SentimentAnalyzer::new(),
            rewriter: Arc::new(ScriptedModel(
                "The commenter loves the photo. The commenter is impressed.".to_string(),
            )),
            interpreter: Arc::new(ScriptedModel(
                "Excited. The audience responds warmly.".to_string(),
            )),
            http: reqwest::Client::new(),
            instagram_base_url: instagram_base_url.to_string(),
        })
    }

    fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn text_analysis_scores_and_plots() {
        let app = router(test_state(DEFAULT_INSTAGRAM_BASE_URL));
        let response = app
            .oneshot(json_post(
                "/api/text-analysis",
                r#"{"text":"I love this, it's amazing!"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["scores"]["compound"].as_f64().unwrap() > 0.0);
        assert!(body["scores"]["positive"].as_str().unwrap().ends_with('%'));
        assert!(!body["plot"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_text_is_rejected() {
        let app = router(test_state(DEFAULT_INSTAGRAM_BASE_URL));
        let response = app
            .oneshot(json_post("/api/text-analysis", r#"{"text":"  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Text is required");
    }

    #[tokio::test]
    async fn malformed_json_does_not_crash_the_router() {
        let app = router(test_state(DEFAULT_INSTAGRAM_BASE_URL));
        let response = app
            .clone()
            .oneshot(json_post("/api/text-analysis", "{not json"))
            .await
            .unwrap();
        assert!(response.status().is_client_error());

        // the router keeps serving
        let response = app
            .oneshot(json_post("/api/text-analysis", r#"{"text":"fine"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn insta_analysis_requires_credentials_and_url() {
        let app = router(test_state(DEFAULT_INSTAGRAM_BASE_URL));
        let response = app
            .oneshot(json_post(
                "/api/insta-analysis",
                r#"{"postUrl":"https://www.instagram.com/p/Dg/"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Authentication details and post URL are required"
        );
    }

    #[tokio::test]
    async fn insta_analysis_happy_path_with_session() {
        let mut server = mockito::Server::new_async().await;
        let _comments = server
            .mock("GET", "/api/v1/media/224/comments/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"comments":[{"text":"🔥🔥"},{"text":"love this"}]}"#)
            .create_async()
            .await;
        let _info = server
            .mock("GET", "/api/v1/media/224/info/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"caption":{"text":"sunset at the pier"}}]}"#)
            .create_async()
            .await;

        let app = router(test_state(&server.url()));
        let response = app
            .oneshot(json_post(
                "/api/insta-analysis",
                r#"{"sessionId":"abc123","postUrl":"https://www.instagram.com/p/Dg/"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["caption"], "sunset at the pier");
        assert!(body["avg_compound_score"].as_f64().is_some());
        assert!(!body["interpretation"].as_str().unwrap().is_empty());
        assert!(!body["plot"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_500_with_error_body() {
        let mut server = mockito::Server::new_async().await;
        let _comments = server
            .mock("GET", "/api/v1/media/224/comments/")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let app = router(test_state(&server.url()));
        let response = app
            .oneshot(json_post(
                "/api/insta-analysis",
                r#"{"sessionId":"stale","postUrl":"https://www.instagram.com/p/Dg/"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("403"));
    }
}
