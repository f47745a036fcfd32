//! OpenAI-compatible chat-completions adapter.
//!
//! Works against any provider exposing the `/chat/completions` surface
//! (OpenAI, DashScope compatible mode, DeepSeek, Moonshot): the endpoint
//! and key select the provider, the model id is passed per call.
//!
//! Every request carries a bounded timeout; the core has no cancellation
//! path, so the bound lives here.

use async_trait::async_trait;
use scholar_application::ports::llm_client::{CompletionOptions, LlmClient, ModelCallError};
use scholar_domain::{Message, MessageContent};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for OpenAI-compatible chat-completions endpoints.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ModelCallError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ModelCallError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: WireContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

fn to_wire(message: &Message) -> WireMessage {
    let content = match &message.content {
        MessageContent::Text(text) => WireContent::Text(text.clone()),
        MessageContent::TextWithImage { text, image_base64 } => WireContent::Parts(vec![
            WirePart::Text { text: text.clone() },
            WirePart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("data:image/jpeg;base64,{image_base64}"),
                },
            },
        ]),
    };
    WireMessage {
        role: message.role.clone(),
        content,
    }
}

#[async_trait]
impl LlmClient for OpenAiCompatClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        options: CompletionOptions,
    ) -> Result<String, ModelCallError> {
        let request = ChatRequest {
            model,
            messages: messages.iter().map(to_wire).collect(),
            response_format: options.json_output.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model, messages = messages.len(), "sending completion request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelCallError::Timeout
                } else {
                    ModelCallError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelCallError::Provider(format!("{status}: {body}")));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelCallError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                ModelCallError::MalformedResponse("no choices in response".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_message_serializes_as_plain_string() {
        let wire = to_wire(&Message::user("hello"));
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["role"], "user");
        assert_eq!(value["content"], "hello");
    }

    #[test]
    fn test_image_message_serializes_as_parts_array() {
        let wire = to_wire(&Message::user_with_image("what is this?", "aW1n"));
        let value = serde_json::to_value(&wire).unwrap();
        let parts = value["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "what is this?");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/jpeg;base64,aW1n"
        );
    }

    #[test]
    fn test_agent_turns_keep_their_role_string() {
        let wire = to_wire(&Message::spoken_by("Prof. Chen", "my view"));
        assert_eq!(wire.role, "Prof. Chen");
    }

    #[test]
    fn test_json_output_requests_response_format() {
        let request = ChatRequest {
            model: "m",
            messages: vec![to_wire(&Message::user("x"))],
            response_format: Some(ResponseFormat {
                format_type: "json_object",
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_default_options_omit_response_format() {
        let request = ChatRequest {
            model: "m",
            messages: vec![],
            response_format: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("response_format").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenAiCompatClient::new("https://api.example.com/v1/", "key").unwrap();
        assert_eq!(client.base_url, "https://api.example.com/v1");
    }
}
