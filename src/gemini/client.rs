//! Gemini API client
//!
//! Direct HTTP client for the Gemini `generateContent` endpoint. All
//! upstream calls are proxied through the backend; the API key never
//! leaves the server. A single call is made per request, under a hard
//! timeout, with no retries.

use std::time::Duration;

use anyhow::anyhow;

use crate::config::GeminiConfig;
use crate::error::AppError;
use crate::gemini::types::{
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, RequestContent, TurnRole,
};

const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini generative-language API
///
/// Holds a shared `reqwest::Client` for connection pooling; cheap to clone.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// Assemble the upstream request body: the full ordered conversation, the
/// fixed generation parameters, and the persona as the system instruction.
pub fn build_request(contents: Vec<RequestContent>, persona: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents,
        generation_config: GenerationConfig::default(),
        system_instruction: Some(RequestContent::instruction(persona)),
    }
}

impl GeminiClient {
    /// Create a client from configuration
    ///
    /// Returns `AppError::ApiKeyMissing` when no key is configured.
    pub fn from_config(config: &GeminiConfig) -> Result<Self, AppError> {
        let api_key = config.api_key.clone().ok_or(AppError::ApiKeyMissing)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: GEMINI_API_BASE_URL.to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Override the base URL (used by tests to point at a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Model name this client calls
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the accumulated conversation to the model and return its reply
    ///
    /// `contents` must hold every prior turn in chronological order plus the
    /// new user message; the persona is attached as the system instruction.
    pub async fn generate(
        &self,
        contents: Vec<RequestContent>,
        persona: &str,
    ) -> Result<String, AppError> {
        let request_body = build_request(contents, persona);
        self.call(&request_body).await
    }

    /// Single-turn classification call constrained to a closed label set
    ///
    /// Callers treat any error as "no label"; classification failures never
    /// surface to the chat caller.
    pub async fn classify(&self, message: &str, labels: &[&str]) -> Result<String, AppError> {
        let prompt = format!(
            "Classify the following question into exactly one of these categories: {}.\n\
             Respond with only the category name, nothing else.\n\nQuestion: {}",
            labels.join(", "),
            message
        );
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent::turn(TurnRole::User, prompt)],
            generation_config: GenerationConfig {
                temperature: 0.0,
                max_output_tokens: 16,
                ..GenerationConfig::default()
            },
            system_instruction: None,
        };
        self.call(&request_body).await
    }

    async fn call(&self, request_body: &GenerateContentRequest) -> Result<String, AppError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        tracing::debug!(
            model = %self.model,
            turns = request_body.contents.len(),
            "Calling Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .json(request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::UpstreamTimeout
                } else {
                    AppError::UpstreamTransport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Gemini API returned error status"
            );

            return Err(AppError::UpstreamStatus {
                status: status_code,
                body: error_body,
            });
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| AppError::UpstreamTransport(e.to_string()))?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_body).map_err(|e| {
                AppError::UpstreamFormat(format!(
                    "Failed to parse JSON response from Gemini API: {}",
                    e
                ))
            })?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Err(AppError::UpstreamFormat(format!(
                    "Gemini API blocked the prompt: {}",
                    reason
                )));
            }
        }

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .map(|p| p.text.clone())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::UpstreamFormat("Unexpected response from Gemini API".to_string())
            })?;

        tracing::debug!(response_len = text.len(), "Received response from Gemini API");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serial_test::serial;

    fn test_client(base_url: &str) -> GeminiClient {
        let config = GeminiConfig {
            api_key: Some("test-key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 5,
        };
        GeminiClient::from_config(&config)
            .unwrap()
            .with_base_url(base_url)
    }

    #[test]
    fn test_from_config_without_key() {
        let config = GeminiConfig {
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            timeout_secs: 5,
        };
        let result = GeminiClient::from_config(&config);
        assert!(matches!(result, Err(AppError::ApiKeyMissing)));
    }

    #[test]
    fn test_build_request_preserves_turn_order() {
        let contents = vec![
            RequestContent::turn(TurnRole::User, "first question"),
            RequestContent::turn(TurnRole::Model, "first answer"),
            RequestContent::turn(TurnRole::User, "second question"),
            RequestContent::turn(TurnRole::Model, "second answer"),
            RequestContent::turn(TurnRole::User, "third question"),
        ];
        let request = build_request(contents, "persona text");
        assert_eq!(request.contents.len(), 5);

        let json = serde_json::to_value(&request).unwrap();
        let turns = json["contents"].as_array().unwrap();
        assert_eq!(turns[0]["role"], "user");
        assert_eq!(turns[1]["role"], "model");
        assert_eq!(turns[2]["role"], "user");
        assert_eq!(turns[3]["role"], "model");
        assert_eq!(turns[4]["role"], "user");
        assert_eq!(turns[0]["parts"][0]["text"], "first question");
        assert_eq!(turns[4]["parts"][0]["text"], "third question");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "persona text");
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {
                            "parts": [{"text": "This is a test response"}],
                            "role": "model"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client
            .generate(
                vec![RequestContent::turn(TurnRole::User, "hello")],
                "persona",
            )
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "This is a test response");
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_non_success_status_carries_code() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(429)
            .with_body(r#"{"error": "Rate limit exceeded"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client
            .generate(vec![RequestContent::turn(TurnRole::User, "hello")], "p")
            .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("429"), "got: {}", err);
        assert!(matches!(err, AppError::UpstreamStatus { status: 429, .. }));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_empty_candidates() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client
            .generate(vec![RequestContent::turn(TurnRole::User, "hello")], "p")
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(AppError::UpstreamFormat(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_blocked_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [],
                    "promptFeedback": {"blockReason": "SAFETY"}
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client
            .generate(vec![RequestContent::turn(TurnRole::User, "hello")], "p")
            .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(err, AppError::UpstreamFormat(_)));
    }

    #[tokio::test]
    #[serial]
    async fn test_generate_invalid_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .with_status(200)
            .with_body("This is not JSON")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client
            .generate(vec![RequestContent::turn(TurnRole::User, "hello")], "p")
            .await;

        mock.assert_async().await;
        assert!(matches!(result, Err(AppError::UpstreamFormat(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_classify_sends_label_prompt() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::Regex("Skills".to_string()))
            .with_status(200)
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {"parts": [{"text": "Skills"}], "role": "model"}
                    }]
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client
            .classify("what languages do you know?", &["Experience", "Skills"])
            .await;

        mock.assert_async().await;
        assert_eq!(result.unwrap(), "Skills");
    }
}
