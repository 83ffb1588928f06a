//! AI content bridge client.
//!
//! Talks to the backend proxy (`cardeck-server` or a compatible
//! deployment): a login exchange for a bearer token, document
//! transformations, topic generation, and social caption variants. The
//! client never builds prompts — that stays behind the proxy.

pub mod caption;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use caption::{clean_caption, split_thread};

/// Operations the bridge can perform on the current text or topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeAction {
    Summarize,
    Improve,
    FixGrammar,
    MakeSocial,
    FromTopic,
    SocialCaption,
}

/// Request body for the action endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    pub action: BridgeAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_thread_mode: Option<bool>,
}

/// Response body: generated content, caption variants, or an error string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeReply {
    pub content: Option<String>,
    pub captions: Option<Vec<String>>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    success: bool,
    token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    topic: &'a str,
    pages: u32,
}

/// Client for the backend proxy.
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BridgeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Reuse a previously issued token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Exchange the shared password for a bearer token and remember it.
    pub async fn login(&mut self, password: &str) -> Result<String> {
        let reply: LoginReply = self
            .http
            .post(self.url("/api/login"))
            .json(&LoginBody { password })
            .send()
            .await?
            .json()
            .await?;

        match reply.token {
            Some(token) if reply.success => {
                self.token = Some(token.clone());
                Ok(token)
            }
            _ => Err(Error::Bridge(
                reply.error.unwrap_or_else(|| "login failed".to_string()),
            )),
        }
    }

    /// Check whether the stored token is still accepted.
    pub async fn verify(&self) -> Result<bool> {
        let Some(token) = &self.token else {
            return Ok(false);
        };
        let response = self
            .http
            .get(self.url("/api/verify"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    /// Generate a whole deck's Markdown from a topic.
    pub async fn generate(&self, topic: &str, pages: u32) -> Result<String> {
        let request = self
            .authorized(self.http.post(self.url("/api/generate")))
            .json(&GenerateBody { topic, pages });
        let reply = self.send(request).await?;
        reply
            .content
            .ok_or_else(|| Error::Bridge("empty response".to_string()))
    }

    /// Run a text transformation (summarize, improve, ...) and return the
    /// replacement Markdown.
    pub async fn transform(&self, action: BridgeAction, text: &str) -> Result<String> {
        let reply = self
            .action_request(BridgeRequest {
                action,
                text: Some(text.to_string()),
                topic: None,
                is_thread_mode: None,
            })
            .await?;
        reply
            .content
            .ok_or_else(|| Error::Bridge("empty response".to_string()))
    }

    /// Generate Markdown from a topic through the action endpoint.
    pub async fn from_topic(&self, topic: &str) -> Result<String> {
        let reply = self
            .action_request(BridgeRequest {
                action: BridgeAction::FromTopic,
                text: None,
                topic: Some(topic.to_string()),
                is_thread_mode: None,
            })
            .await?;
        reply
            .content
            .ok_or_else(|| Error::Bridge("empty response".to_string()))
    }

    /// Generate social caption variants for the current text.
    pub async fn captions(&self, text: &str, thread_mode: bool) -> Result<Vec<String>> {
        let reply = self
            .action_request(BridgeRequest {
                action: BridgeAction::SocialCaption,
                text: Some(text.to_string()),
                topic: None,
                is_thread_mode: Some(thread_mode),
            })
            .await?;
        reply
            .captions
            .ok_or_else(|| Error::Bridge("empty response".to_string()))
    }

    async fn action_request(&self, body: BridgeRequest) -> Result<BridgeReply> {
        let request = self
            .authorized(self.http.post(self.url("/api/gemini")))
            .json(&body);
        self.send(request).await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<BridgeReply> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // The caller prompts for re-authentication.
            return Err(Error::Unauthorized);
        }

        let reply: BridgeReply = response.json().await?;
        if !status.is_success() {
            return Err(Error::Bridge(
                reply
                    .error
                    .unwrap_or_else(|| format!("request failed with status {status}")),
            ));
        }
        Ok(reply)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_serialize_snake_case() {
        let json = serde_json::to_string(&BridgeAction::SocialCaption).unwrap();
        assert_eq!(json, "\"social_caption\"");
    }

    #[test]
    fn request_uses_camel_case_and_omits_blanks() {
        let body = BridgeRequest {
            action: BridgeAction::Summarize,
            text: Some("hi".to_string()),
            topic: None,
            is_thread_mode: Some(true),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"isThreadMode\":true"));
        assert!(!json.contains("topic"));
    }

    #[test]
    fn base_url_slash_is_tolerated() {
        let client = BridgeClient::new("http://localhost:3000/");
        assert_eq!(client.url("/api/login"), "http://localhost:3000/api/login");
    }
}
