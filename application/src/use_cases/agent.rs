//! Conversational agent use case.
//!
//! An agent owns one (persona, memory, model-binding) triple. `chat` is
//! the only memory-mutating model call and rolls back on failure, so a
//! failed call can never leave a half-appended turn in memory.

use crate::ports::llm_client::{CompletionOptions, LlmClient, ModelCallError};
use scholar_domain::{Message, PromptTemplate, SpeakerProfile};
use std::sync::Arc;
use tracing::{debug, warn};

/// Prefix marking an inline failure string.
///
/// Agent methods return error text instead of raising; callers must
/// treat any reply starting with this marker as a failure, not a valid
/// model reply.
pub const FAILURE_MARKER: &str = "[model-error]";

/// Check whether a reply string is an inline failure.
pub fn is_failure_reply(reply: &str) -> bool {
    reply.starts_with(FAILURE_MARKER)
}

/// A single persona bound to one model and its own conversation memory.
pub struct ConversationalAgent {
    name: String,
    system_prompt: String,
    model: String,
    client: Arc<dyn LlmClient>,
    /// memory[0] is always the system message.
    memory: Vec<Message>,
}

impl ConversationalAgent {
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        model: impl Into<String>,
        client: Arc<dyn LlmClient>,
    ) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            name: name.into(),
            memory: vec![Message::system(system_prompt.clone())],
            system_prompt,
            model: model.into(),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The agent's public identity for roster listings.
    pub fn profile(&self) -> SpeakerProfile {
        SpeakerProfile::new(&self.name, &self.system_prompt)
    }

    pub fn memory(&self) -> &[Message] {
        &self.memory
    }

    /// Send one user turn and return the reply.
    ///
    /// On success the user turn and the assistant reply are both
    /// appended to memory. On failure the just-appended user turn is
    /// removed and a marker-prefixed error string is returned, leaving
    /// memory exactly as it was before the call.
    pub async fn chat(&mut self, user_text: &str, image_base64: Option<&str>) -> String {
        let message = match image_base64 {
            Some(image) => Message::user_with_image(user_text, image),
            None => Message::user(user_text),
        };
        self.memory.push(message);

        match self
            .client
            .complete(&self.model, &self.memory, CompletionOptions::default())
            .await
        {
            Ok(reply) => {
                debug!(agent = %self.name, "chat turn completed");
                self.memory.push(Message::assistant(reply.clone()));
                reply
            }
            Err(e) => {
                warn!(agent = %self.name, error = %e, "chat call failed, rolling back user turn");
                self.memory.pop();
                format!("{FAILURE_MARKER} model call failed: {e}")
            }
        }
    }

    /// Reset memory to the initial one-element system sequence.
    pub fn clear_memory(&mut self) {
        self.memory = vec![Message::system(self.system_prompt.clone())];
    }

    /// Generate a structured report from `context`.
    ///
    /// Stateless with respect to memory: builds an ephemeral two-message
    /// exchange with a fixed editor persona and never reads or mutates
    /// the agent's own history. Returns a marker-prefixed error string
    /// on failure.
    pub async fn summarize(&self, context: &str, output_format: &str) -> String {
        let messages = [
            Message::system(PromptTemplate::report_editor_system()),
            Message::user(PromptTemplate::report_request(context, output_format)),
        ];

        match self
            .client
            .complete(&self.model, &messages, CompletionOptions::default())
            .await
        {
            Ok(report) => report,
            Err(e) => {
                warn!(agent = %self.name, error = %e, "report generation failed");
                format!("{FAILURE_MARKER} report generation failed: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a fixed queue of replies; records every call's messages.
    struct ScriptedClient {
        replies: Mutex<VecDeque<Result<String, String>>>,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String, String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn complete(
            &self,
            _model: &str,
            messages: &[Message],
            _options: CompletionOptions,
        ) -> Result<String, ModelCallError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected model call")
                .map_err(ModelCallError::Transport)
        }
    }

    fn agent(client: Arc<ScriptedClient>) -> ConversationalAgent {
        ConversationalAgent::new("reader", "You read papers carefully.", "test-model", client)
    }

    #[tokio::test]
    async fn test_chat_success_appends_two_messages() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("a reply".to_string())]));
        let mut agent = agent(client.clone());

        let reply = agent.chat("hello", None).await;

        assert_eq!(reply, "a reply");
        assert!(!is_failure_reply(&reply));
        assert_eq!(agent.memory().len(), 3);
        assert_eq!(agent.memory()[1].role, "user");
        assert_eq!(agent.memory()[2].content.text(), "a reply");
    }

    #[tokio::test]
    async fn test_chat_failure_rolls_back_memory() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err("connection refused".to_string()),
            Ok("recovered".to_string()),
        ]));
        let mut agent = agent(client.clone());
        let before = agent.memory().to_vec();

        let reply = agent.chat("hello", None).await;

        assert!(is_failure_reply(&reply));
        assert!(reply.contains("connection refused"));
        assert_eq!(agent.memory(), &before[..]);

        // A subsequent successful call appends exactly two messages
        agent.chat("hello again", None).await;
        assert_eq!(agent.memory().len(), before.len() + 2);
    }

    #[tokio::test]
    async fn test_chat_with_image_builds_structured_payload() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("seen".to_string())]));
        let mut agent = agent(client.clone());

        agent.chat("what is this?", Some("aW1n")).await;

        let calls = client.calls.lock().unwrap();
        assert!(calls[0][1].content.has_image());
        assert_eq!(calls[0][1].content.text(), "what is this?");
    }

    #[tokio::test]
    async fn test_clear_memory_resets_to_system_message() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("r".to_string())]));
        let mut agent = agent(client);
        agent.chat("hi", None).await;

        agent.clear_memory();

        assert_eq!(agent.memory().len(), 1);
        assert_eq!(agent.memory()[0].role, "system");
        assert_eq!(agent.memory()[0].content.text(), "You read papers carefully.");
    }

    #[tokio::test]
    async fn test_summarize_does_not_touch_memory() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("# Minutes".to_string())]));
        let agent = agent(client.clone());

        let report = agent.summarize("[user]: hello", "markdown").await;

        assert_eq!(report, "# Minutes");
        assert_eq!(agent.memory().len(), 1);
        // The ephemeral exchange is two messages, none from memory
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls[0].len(), 2);
        assert!(calls[0][1].content.text().contains("[user]: hello"));
    }

    #[tokio::test]
    async fn test_summarize_failure_returns_marker_string() {
        let client = Arc::new(ScriptedClient::new(vec![Err("quota".to_string())]));
        let agent = agent(client);

        let report = agent.summarize("context", "markdown").await;

        assert!(is_failure_reply(&report));
    }

    #[tokio::test]
    async fn test_failure_marker_detection() {
        assert!(is_failure_reply(&format!("{FAILURE_MARKER} anything")));
        assert!(!is_failure_reply("a normal reply"));
        let client = Arc::new(ScriptedClient::new(vec![]));
        let _ = agent(client.clone());
        assert_eq!(client.call_count(), 0);
    }
}
