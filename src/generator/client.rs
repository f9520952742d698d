use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::errors::AppError;

/// A text-generation service: prompt in, unstructured text out.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Google Generative Language REST client (`generateContent`).
#[derive(Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, AppError> {
        config
            .gemini_api_key
            .as_deref()
            .map(|key| {
                Self::new(
                    key,
                    &config.gemini_model,
                    &config.gemini_base_url,
                    config.generation_timeout,
                )
            })
            .transpose()
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn transport_error(&self, e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            AppError::Generation(format!("generation timed out after {:?}", self.timeout))
        } else {
            AppError::Generation(format!("generation request failed: {e}"))
        }
    }
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        log::info!("Sending generation request to model {}", self.model);
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Generation(format!("generation service returned {status}: {text}")));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;
        let text = candidate_text(parsed)?;
        log::debug!("Generation returned {} characters", text.len());
        Ok(text)
    }
}

/// Concatenated text parts of the first candidate that has any.
fn candidate_text(response: GenerateResponse) -> Result<String, AppError> {
    response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .find(|text| !text.trim().is_empty())
        .ok_or_else(|| AppError::Generation("generation returned no text".to_string()))
}
