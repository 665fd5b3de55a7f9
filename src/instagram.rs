//! Instagram comment source: resolves a post URL to a media pk, then pulls
//! comments and the caption from the private web API.
//!
//! Authenticated with a `sessionid` cookie, or username/password against the
//! web login endpoint. No retry, no backoff: any upstream failure aborts the
//! analysis request that triggered it.

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use reqwest::header;
use serde::Deserialize;

use crate::error::AnalysisError;

/// Web app id Instagram expects on API calls coming from a browser session.
const IG_APP_ID: &str = "936619743392459";

static USER_AGENTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:124.0) Gecko/20100101 Firefox/124.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    ]
});

static SHORTCODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"instagram\.com/(?:[A-Za-z0-9_.]+/)?(?:p|reel|tv)/([A-Za-z0-9_-]+)")
        .expect("shortcode regex")
});

const SHORTCODE_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Decode a post shortcode into its numeric media pk (base-64 over the
/// URL-safe alphabet, most significant digit first).
pub fn decode_shortcode(code: &str) -> Result<u64, AnalysisError> {
    if code.is_empty() {
        return Err(AnalysisError::input("Empty media shortcode".to_string()));
    }
    code.chars().try_fold(0u64, |acc, c| {
        let idx = SHORTCODE_ALPHABET
            .find(c)
            .ok_or_else(|| AnalysisError::input(format!("Invalid shortcode character '{c}'")))?;
        acc.checked_mul(64)
            .and_then(|v| v.checked_add(idx as u64))
            .ok_or_else(|| AnalysisError::input("Shortcode out of range".to_string()))
    })
}

/// Extract the shortcode from a post/reel URL and decode it.
pub fn media_pk_from_url(post_url: &str) -> Result<u64, AnalysisError> {
    let caps = SHORTCODE_RE.captures(post_url).ok_or_else(|| {
        AnalysisError::input("Not a recognizable Instagram post URL".to_string())
    })?;
    decode_shortcode(&caps[1])
}

/// The narrow interface the pipeline sees. Mock implementations drive the
/// orchestrator tests.
#[async_trait]
pub trait CommentSource: Send + Sync {
    async fn resolve_media(&self, post_url: &str) -> Result<u64, AnalysisError>;
    async fn fetch_comments(&self, media_pk: u64, limit: usize)
        -> Result<Vec<String>, AnalysisError>;
    async fn fetch_caption(&self, media_pk: u64) -> Result<Option<String>, AnalysisError>;
}

/// An authenticated Instagram web session.
pub struct InstagramSession {
    client: reqwest::Client,
    session_id: String,
    user_agent: &'static str,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CommentsPage {
    #[serde(default)]
    comments: Vec<CommentItem>,
    next_min_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentItem {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct MediaInfo {
    #[serde(default)]
    items: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct MediaItem {
    caption: Option<Caption>,
}

#[derive(Debug, Deserialize)]
struct Caption {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    authenticated: bool,
}

impl InstagramSession {
    /// Reuse an existing `sessionid` cookie.
    pub fn with_base_url(client: reqwest::Client, session_id: String, base_url: String) -> Self {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);
        Self {
            client,
            session_id,
            user_agent,
            base_url,
        }
    }

    /// Username/password login through the web endpoint. Plain handshake
    /// only: no device persistence, no checkpoint resolution.
    pub async fn login_with_base_url(
        client: reqwest::Client,
        username: &str,
        password: &str,
        base_url: String,
    ) -> Result<Self, AnalysisError> {
        let user_agent = USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        // a csrf token is handed out on the first unauthenticated hit
        let bootstrap = client
            .get(format!("{base_url}/"))
            .header(header::USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Instagram unreachable: {e}")))?;
        let csrf = cookie_value(bootstrap.headers(), "csrftoken").ok_or_else(|| {
            AnalysisError::upstream("Instagram did not provide a csrf token".to_string())
        })?;

        let enc_password = format!(
            "#PWD_INSTAGRAM_BROWSER:0:{}:{}",
            Utc::now().timestamp(),
            password
        );
        let response = client
            .post(format!("{base_url}/api/v1/web/accounts/login/ajax/"))
            .header(header::USER_AGENT, user_agent)
            .header("X-CSRFToken", &csrf)
            .header(header::REFERER, format!("{base_url}/"))
            .header(header::COOKIE, format!("csrftoken={csrf}"))
            .form(&[("username", username), ("enc_password", enc_password.as_str())])
            .send()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Instagram login failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::upstream(format!(
                "Instagram login returned {status}"
            )));
        }

        let session_id = cookie_value(response.headers(), "sessionid");
        let reply: LoginReply = response
            .json()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Instagram login unreadable: {e}")))?;
        if !reply.authenticated {
            return Err(AnalysisError::upstream(
                "Instagram rejected the credentials".to_string(),
            ));
        }
        let session_id = session_id.ok_or_else(|| {
            AnalysisError::upstream("Instagram login did not yield a session cookie".to_string())
        })?;

        Ok(Self {
            client,
            session_id,
            user_agent,
            base_url,
        })
    }

    fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(header::USER_AGENT, self.user_agent)
            .header("X-IG-App-ID", IG_APP_ID)
            .header(header::COOKIE, format!("sessionid={}", self.session_id))
    }
}

fn cookie_value(headers: &header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let (key, rest) = cookie.split_once('=')?;
            if key.trim() == name {
                Some(rest.split(';').next().unwrap_or(rest).to_string())
            } else {
                None
            }
        })
}

#[async_trait]
impl CommentSource for InstagramSession {
    async fn resolve_media(&self, post_url: &str) -> Result<u64, AnalysisError> {
        media_pk_from_url(post_url)
    }

    async fn fetch_comments(
        &self,
        media_pk: u64,
        limit: usize,
    ) -> Result<Vec<String>, AnalysisError> {
        let mut texts = Vec::new();
        let mut min_id: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/api/v1/media/{}/comments/?can_support_threading=true",
                self.base_url, media_pk
            );
            if let Some(ref id) = min_id {
                url.push_str(&format!("&min_id={}", urlencoding::encode(id)));
            }

            let response = self
                .get(url)
                .send()
                .await
                .map_err(|e| AnalysisError::upstream(format!("Comment fetch failed: {e}")))?;
            let status = response.status();
            if !status.is_success() {
                return Err(AnalysisError::upstream(format!(
                    "Instagram comments endpoint returned {status}"
                )));
            }

            let page: CommentsPage = response.json().await.map_err(|e| {
                AnalysisError::upstream(format!("Instagram comments unreadable: {e}"))
            })?;
            if page.comments.is_empty() {
                break;
            }

            for comment in page.comments {
                texts.push(comment.text);
                if texts.len() >= limit {
                    return Ok(texts);
                }
            }

            match page.next_min_id {
                Some(next) => min_id = Some(next),
                None => break,
            }
        }

        Ok(texts)
    }

    async fn fetch_caption(&self, media_pk: u64) -> Result<Option<String>, AnalysisError> {
        let url = format!("{}/api/v1/media/{}/info/", self.base_url, media_pk);
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Media info fetch failed: {e}")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::upstream(format!(
                "Instagram media endpoint returned {status}"
            )));
        }

        let info: MediaInfo = response
            .json()
            .await
            .map_err(|e| AnalysisError::upstream(format!("Instagram media unreadable: {e}")))?;
        Ok(info
            .items
            .first()
            .and_then(|item| item.caption.as_ref())
            .map(|c| c.text.clone())
            .filter(|t| !t.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcode_decodes_base64url_digits() {
        assert_eq!(decode_shortcode("B").unwrap(), 1);
        assert_eq!(decode_shortcode("BA").unwrap(), 64);
        assert_eq!(decode_shortcode("Dg").unwrap(), 3 * 64 + 32);
        assert_eq!(decode_shortcode("_").unwrap(), 63);
    }

    #[test]
    fn media_pk_from_post_and_reel_urls() {
        assert_eq!(
            media_pk_from_url("https://www.instagram.com/p/Dg/").unwrap(),
            224
        );
        assert_eq!(
            media_pk_from_url("https://instagram.com/reel/BA").unwrap(),
            64
        );
        assert_eq!(
            media_pk_from_url("https://www.instagram.com/someuser/p/Dg/?igsh=abc").unwrap(),
            224
        );
    }

    #[test]
    fn unrecognizable_url_is_input_error() {
        let err = media_pk_from_url("https://example.com/p/Dg/").unwrap_err();
        assert!(matches!(err, AnalysisError::InputValidation(_)));
    }

    #[test]
    fn oversized_shortcode_is_rejected() {
        let err = decode_shortcode("___________").unwrap_err();
        assert!(matches!(err, AnalysisError::InputValidation(_)));
    }

    #[tokio::test]
    async fn fetch_comments_reads_single_page() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/media/224/comments/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"comments":[{"text":"fire 🔥"},{"text":"love it"}]}"#)
            .create_async()
            .await;

        let session = InstagramSession::with_base_url(
            reqwest::Client::new(),
            "session".into(),
            server.url(),
        );
        let comments = session.fetch_comments(224, 100).await.unwrap();
        assert_eq!(comments, vec!["fire 🔥".to_string(), "love it".to_string()]);
    }

    #[tokio::test]
    async fn fetch_comments_stops_at_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/media/224/comments/")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"comments":[{"text":"one"},{"text":"two"},{"text":"three"}],"next_min_id":"abc"}"#,
            )
            .create_async()
            .await;

        let session = InstagramSession::with_base_url(
            reqwest::Client::new(),
            "session".into(),
            server.url(),
        );
        let comments = session.fetch_comments(224, 2).await.unwrap();
        assert_eq!(comments.len(), 2);
    }

    #[tokio::test]
    async fn expired_session_surfaces_as_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/media/224/comments/")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .create_async()
            .await;

        let session = InstagramSession::with_base_url(
            reqwest::Client::new(),
            "stale".into(),
            server.url(),
        );
        let err = session.fetch_comments(224, 100).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Upstream(_)));
    }

    #[tokio::test]
    async fn caption_comes_from_first_item() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/media/224/info/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"caption":{"text":"golden hour"}}]}"#)
            .create_async()
            .await;

        let session = InstagramSession::with_base_url(
            reqwest::Client::new(),
            "session".into(),
            server.url(),
        );
        let caption = session.fetch_caption(224).await.unwrap();
        assert_eq!(caption.as_deref(), Some("golden hour"));
    }

    #[tokio::test]
    async fn missing_caption_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/media/224/info/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"caption":null}]}"#)
            .create_async()
            .await;

        let session = InstagramSession::with_base_url(
            reqwest::Client::new(),
            "session".into(),
            server.url(),
        );
        assert!(session.fetch_caption(224).await.unwrap().is_none());
    }
}
