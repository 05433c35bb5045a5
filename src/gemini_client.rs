use async_trait::async_trait;
use eyre::{Result, eyre};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::completion::{Completion, CompletionError};
use crate::config::Config;

pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: Url,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| eyre!("GEMINI_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        info!("Initialized Gemini client for model {}", config.model);

        Ok(Self {
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.clone(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.as_str().trim_end_matches('/'),
            self.model
        )
    }

    pub async fn generate_content(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [
                        {
                            "text": prompt
                        }
                    ]
                }
            ],
            "generationConfig": {
                "temperature": 0.7,
                "topP": 0.8,
                "topK": 40,
                "maxOutputTokens": 2048
            }
        });

        debug!("Sending request to Gemini model {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API request failed with response: {}", error_text);
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let response_json: Value = response.json().await?;

        debug!("Received response from Gemini API: {}", response_json);

        extract_text(&response_json)
    }
}

#[async_trait]
impl Completion for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.generate_content(prompt).await
    }
}

/// Pulls the concatenated text parts of the first candidate out of a
/// `generateContent` reply.
fn extract_text(response_json: &Value) -> Result<String, CompletionError> {
    if let Some(reason) = response_json
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(|reason| reason.as_str())
    {
        return Err(CompletionError::Blocked(reason.to_string()));
    }

    let first_candidate = response_json
        .get("candidates")
        .and_then(|candidates| candidates.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| CompletionError::Malformed("no candidates in response".to_string()))?;

    let parts = first_candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array());

    let Some(parts) = parts else {
        let finish_reason = first_candidate
            .get("finishReason")
            .and_then(|r| r.as_str())
            .unwrap_or("unknown");
        return Err(CompletionError::Blocked(format!(
            "candidate finished with {}",
            finish_reason
        )));
    };

    let mut result = String::new();
    for part in parts {
        if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
            result.push_str(text);
        }
    }

    if result.is_empty() {
        return Err(CompletionError::Malformed(
            "candidate contained no text".to_string(),
        ));
    }

    Ok(result)
}
