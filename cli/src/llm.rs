//! Chat-completion client for OpenAI-compatible endpoints.

use serde::{Deserialize, Serialize};

use paperparse::{CompletionPolicy, Error, Result, TextCompletion};

pub const DEFAULT_ENDPOINT: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";
pub const DEFAULT_MODEL: &str = "glm-4-flash";

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 2000;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: String,
}

/// Blocking HTTP completion client.
pub struct HttpCompletion {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    model: String,
    policy: CompletionPolicy,
}

impl HttpCompletion {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        policy: CompletionPolicy,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(policy.timeout)
            .build()
            .map_err(|e| Error::Completion(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            policy,
        })
    }
}

impl TextCompletion for HttpCompletion {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        log::debug!("POST {} (model {})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| Error::Completion(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Completion(format!("HTTP {}: {}", status, body.trim())));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| Error::Completion(format!("Malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::Completion("Response has no choices".to_string()))
    }

    fn policy(&self) -> CompletionPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: DEFAULT_MODEL,
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "glm-4-flash");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["max_tokens"], 2000);
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"ok"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "ok");

        let empty: ChatResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.choices.is_empty());
    }

    #[test]
    fn test_policy_passthrough() {
        let policy = CompletionPolicy::default().with_timeout(Duration::from_secs(5));
        let client = HttpCompletion::new(DEFAULT_ENDPOINT, "key", DEFAULT_MODEL, policy).unwrap();
        assert_eq!(client.policy().timeout, Duration::from_secs(5));
        assert_eq!(client.policy().max_attempts, 3);
    }
}
