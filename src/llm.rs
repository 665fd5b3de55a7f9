//! Language-model collaborators: thin request/response wrappers around the
//! Gemini and Groq completion APIs. Both are treated as black boxes that take
//! one prompt string and return one text blob.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::error::AnalysisError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GROQ_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GROQ_BASE_URL: &str = "https://api.groq.com";

/// One prompt in, one text blob out. Injected into the orchestrator so tests
/// can script responses.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Split a model response into sentence candidates: period-terminated
/// fragments, trimmed, empties discarded.
pub fn split_statements(text: &str) -> Vec<String> {
    text.split('.')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Gemini (intent rewriting)
// ---------------------------------------------------------------------------

pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self::with_base_url(client, api_key, model, GEMINI_BASE_URL.to_string())
    }

    pub fn with_base_url(
        client: reqwest::Client,
        api_key: String,
        model: String,
        base_url: String,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            urlencoding::encode(&self.api_key)
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::upstream(format!(
                "Gemini returned {status}: {detail}"
            )));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Gemini response unreadable: {e}")))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AnalysisError::upstream(
                "Gemini returned no candidates".to_string(),
            ));
        }
        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// Groq (mood interpretation, OpenAI-compatible chat API)
// ---------------------------------------------------------------------------

pub struct GroqClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self::with_base_url(client, api_key, model, GROQ_BASE_URL.to_string())
    }

    pub fn with_base_url(
        client: reqwest::Client,
        api_key: String,
        model: String,
        base_url: String,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl LanguageModel for GroqClient {
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!("{}/openai/v1/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Groq request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AnalysisError::upstream(format!(
                "Groq returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Groq response unreadable: {e}")))?;

        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AnalysisError::upstream(
                "Groq returned no choices".to_string(),
            ));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_statements_drops_empty_fragments() {
        let raw = "The commenter loves the photo. The commenter is impressed.  . ";
        let statements = split_statements(raw);
        assert_eq!(
            statements,
            vec![
                "The commenter loves the photo".to_string(),
                "The commenter is impressed".to_string(),
            ]
        );
    }

    #[test]
    fn split_statements_handles_empty_input() {
        assert!(split_statements("").is_empty());
        assert!(split_statements("...").is_empty());
    }

    #[tokio::test]
    async fn gemini_parses_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-2.5-flash:generateContent",
            )
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"The commenter loves it."}]}}]}"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::with_base_url(
            reqwest::Client::new(),
            "test-key".into(),
            DEFAULT_GEMINI_MODEL.into(),
            server.url(),
        );
        let text = client.generate("rewrite this").await.unwrap();
        assert_eq!(text, "The commenter loves it.");
    }

    #[tokio::test]
    async fn gemini_surfaces_http_errors_as_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock(
                "POST",
                "/v1beta/models/gemini-2.5-flash:generateContent",
            )
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let client = GeminiClient::with_base_url(
            reqwest::Client::new(),
            "test-key".into(),
            DEFAULT_GEMINI_MODEL.into(),
            server.url(),
        );
        let err = client.generate("rewrite this").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream(_)));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn groq_parses_choice_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"Excited. The audience responds warmly."}}]}"#,
            )
            .create_async()
            .await;

        let client = GroqClient::with_base_url(
            reqwest::Client::new(),
            "test-key".into(),
            DEFAULT_GROQ_MODEL.into(),
            server.url(),
        );
        let text = client.generate("classify this").await.unwrap();
        assert!(text.starts_with("Excited"));
    }

    #[tokio::test]
    async fn groq_empty_choices_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/openai/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = GroqClient::with_base_url(
            reqwest::Client::new(),
            "test-key".into(),
            DEFAULT_GROQ_MODEL.into(),
            server.url(),
        );
        let err = client.generate("classify this").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream(_)));
    }
}
