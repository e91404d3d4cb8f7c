//! Gemini `generateContent` over plain REST.

use anyhow::{Context, Result};
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::ProviderConfig;
use crate::content::{ContentError, ContentProvider};

pub struct GeminiProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl GeminiProvider {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Building HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    /// The API key is read from the environment variable the config names.
    /// A disabled provider has no key and fails every call without a request.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let api_key = if config.enabled {
            std::env::var(&config.api_key_env).ok()
        } else {
            None
        };
        Self::new(
            &config.base_url,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    async fn generate(&self, body: Value) -> Result<String, ContentError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            ContentError::ProviderUnavailable("no API key configured".to_string())
        })?;
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            return Err(ContentError::ProviderUnavailable(format!("HTTP {status}")));
        }

        let parsed: GenerateResponse = resp.json().await?;
        parsed
            .text()
            .ok_or_else(|| ContentError::MalformedResponse("response has no text".to_string()))
    }
}

impl ContentProvider for GeminiProvider {
    async fn generate_text(
        &self,
        prompt: &str,
        system_instruction: &str,
        temperature: f64,
    ) -> Result<String, ContentError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "generationConfig": { "temperature": temperature }
        });
        self.generate(body).await
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<Value, ContentError> {
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });
        let text = self.generate(body).await?;
        Ok(serde_json::from_str(&text)?)
    }
}
