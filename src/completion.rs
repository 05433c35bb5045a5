use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

/// Anything that can go wrong while asking the completion service for text.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response was blocked: {0}")]
    Blocked(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

// The request URL is stripped so nothing from it reaches logs or apologies.
impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        CompletionError::Request(e.without_url())
    }
}

/// A generative-text backend that turns a prompt into a reply.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// User-facing text for a failed call. The reason is flattened onto one line
/// so the apology is always delivered as a single chunk.
pub fn apology(reason: &dyn std::fmt::Display) -> String {
    let reason = reason.to_string();
    let reason = reason.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(
        "I apologize, but I encountered an error: {}. Please try again or rephrase your question.",
        reason
    )
}

/// Calls the backend with a deadline. A blown deadline is reported as
/// [`CompletionError::Timeout`].
pub async fn try_complete(
    completion: &dyn Completion,
    prompt: &str,
    timeout: Duration,
) -> Result<String, CompletionError> {
    debug!("Sending prompt to completion service: {}...", preview(prompt));

    let result = match tokio::time::timeout(timeout, completion.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => Err(CompletionError::Timeout(timeout)),
    };

    match &result {
        Ok(text) => debug!("Received {} characters from completion service", text.len()),
        Err(e) => error!("Error generating content: {}", e),
    }
    result
}

/// Like [`try_complete`] but folds every failure into an apology the user can read.
pub async fn complete_or_apologize(
    completion: &dyn Completion,
    prompt: &str,
    timeout: Duration,
) -> String {
    try_complete(completion, prompt, timeout)
        .await
        .unwrap_or_else(|e| apology(&e))
}

fn preview(prompt: &str) -> String {
    prompt.trim().chars().take(100).collect()
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedCompletion, StalledCompletion};
    use super::*;

    #[tokio::test]
    async fn passes_through_successful_reply() {
        let stub = ScriptedCompletion::always("Stay safe.");
        let reply = complete_or_apologize(&stub, "prompt", Duration::from_secs(1)).await;
        assert_eq!(reply, "Stay safe.");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn failure_becomes_apology_with_reason() {
        let stub = ScriptedCompletion::failing("quota exceeded");
        let reply = complete_or_apologize(&stub, "prompt", Duration::from_secs(1)).await;
        assert!(reply.starts_with("I apologize, but I encountered an error"));
        assert!(reply.contains("quota exceeded"));
    }

    #[tokio::test]
    async fn timeout_becomes_apology() {
        let reply =
            complete_or_apologize(&StalledCompletion, "prompt", Duration::from_millis(20)).await;
        assert!(reply.starts_with("I apologize"));
        assert!(reply.contains("timed out"));
    }

    #[test]
    fn apology_is_a_single_line() {
        let e = CompletionError::Status {
            status: 429,
            body: "{\n  \"error\": \"quota\"\n}".to_string(),
        };
        let text = apology(&e);
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("429"));
        assert!(text.contains("quota"));
    }
}
