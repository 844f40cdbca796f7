use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::{Value, json};

use super::TextGenerator;
use crate::config::GeneratorSettings;
use crate::error::GenerationError;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// OpenAI-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct HttpCompletionClient {
    client: Client,
    settings: GeneratorSettings,
}

impl HttpCompletionClient {
    pub fn new(settings: GeneratorSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build completion http client")?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url)
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.settings.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.0,
        })
    }
}

impl TextGenerator for HttpCompletionClient {
    fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut request = self.client.post(self.endpoint()).json(&self.request_body(prompt));
        if let Some(api_key) = &self.settings.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .map_err(|error| GenerationError::Transport(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let payload: Value = response
            .json()
            .map_err(|error| GenerationError::Transport(error.to_string()))?;
        message_content(&payload)
    }
}

fn message_content(payload: &Value) -> Result<String, GenerationError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .map(str::to_string)
        .ok_or(GenerationError::EmptyResponse)
}
