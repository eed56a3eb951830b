use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// A text-generation capability: one prompt in, one text reply out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// OpenAI-compatible chat-completions client.
#[derive(Clone)]
pub struct AIService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AIService {
    pub fn new(api_key: String, base_url: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn build_payload(&self, prompt: &str) -> JsonValue {
        serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": "You are an expert quiz generator. Follow the requested output format exactly."},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.4
        })
    }

    async fn chat_openai(&self, payload: JsonValue) -> anyhow::Result<String> {
        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .context("completion request failed")?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenAI API Error {}: {}", status, text));
        }

        let body: JsonValue = res.json().await.context("completion body is not JSON")?;
        extract_content(&body)
    }
}

#[async_trait]
impl TextGenerator for AIService {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");
        let payload = self.build_payload(prompt);
        self.chat_openai(payload).await
    }
}

fn extract_content(body: &JsonValue) -> anyhow::Result<String> {
    body.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response format"))
}
