use crate::Config;
use log::debug;
use serde_json::json;
use thiserror::Error;

/// Client for an OpenAI-compatible chat completion endpoint, constructed
/// once at startup from the process configuration.
#[derive(Debug)]
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("error while sending completion request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion response is missing choices[0].message.content")]
    MissingContent,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        LlmClient {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.openai_api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Sends a single-message completion request and returns the raw
    /// assistant text.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "messages": vec![json!({"role": "user", "content": prompt})],
                "temperature": 0,
            }))
            .send()
            .await
            .and_then(|response| response.error_for_status())?;

        let body = response.json::<serde_json::Value>().await?;
        debug!("completion response: {body}");

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(CompletionError::MissingContent)
    }
}
