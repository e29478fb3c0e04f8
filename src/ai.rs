//! HTTP client for the Gemini generate-content API, the platform's AI
//! collaborator (code judging and the assist endpoint).

use color_eyre::{eyre::OptionExt, Result};
use serde::{Deserialize, Serialize};

use crate::services::challenge::AiClient;

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// When no API key is configured the client reports itself disabled and
/// callers degrade gracefully instead of failing requests.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            http: reqwest::Client::new(),
        }
    }
}

impl AiClient for GeminiClient {
    fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_eyre("AI client is not configured")?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let resp = self
            .http
            .post(GENERATE_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::error!("generate-content API error: {status} - {text}");
            color_eyre::eyre::bail!("generate-content API returned {status}");
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_eyre("generate-content API returned no candidates")?;

        Ok(text)
    }
}
