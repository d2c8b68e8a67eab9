use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Extraction oracle abstraction (allows mocking).
pub trait OracleClient: Send + Sync {
    fn complete(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, ExtractionError>;
}

/// HTTP client for an OpenAI-compatible chat completions endpoint.
pub struct HttpOracleClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpOracleClient {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self, ExtractionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ExtractionError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
            client,
            timeout_secs,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Completion response. Providers disagree on where the text lives: modern
/// endpoints use `message.content`, legacy ones a bare `text` field. Both
/// shapes are checked before giving up.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
    text: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    fn completion_text(self) -> Option<String> {
        let choice = self.choices.into_iter().next()?;
        choice
            .message
            .and_then(|m| m.content)
            .or(choice.text)
            .filter(|t| !t.trim().is_empty())
    }
}

impl OracleClient for HttpOracleClient {
    fn complete(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, ExtractionError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                ExtractionError::OracleConnection(self.base_url.clone())
            } else if e.is_timeout() {
                ExtractionError::HttpClient(format!(
                    "Request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                ExtractionError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::OracleStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ExtractionError::ResponseParsing(e.to_string()))?;

        parsed
            .completion_text()
            .ok_or(ExtractionError::EmptyCompletion)
    }
}

/// Mock oracle for testing — returns a configurable completion.
pub struct MockOracleClient {
    completion: String,
}

impl MockOracleClient {
    pub fn new(completion: &str) -> Self {
        Self {
            completion: completion.to_string(),
        }
    }
}

impl OracleClient for MockOracleClient {
    fn complete(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<String, ExtractionError> {
        Ok(self.completion.clone())
    }
}
