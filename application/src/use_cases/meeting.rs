//! Meeting controller use case.
//!
//! The moderator owns the roster and the shared transcript, and advances
//! the discussion one round at a time: pick a speaker, have them speak
//! against the full transcript, append the utterance.

use crate::ports::llm_client::{CompletionOptions, LlmClient};
use crate::use_cases::agent::ConversationalAgent;
use scholar_domain::session::entities::render_transcript;
use scholar_domain::{
    DomainError, Message, PromptTemplate, SpeakerProfile, resolve_speaker, truncate_chars,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How many transcript entries the moderator sees when deciding.
const DECISION_WINDOW: usize = 10;
/// Per-entry character cap inside the decision window.
const DECISION_SNIPPET_CHARS: usize = 100;

/// Moderator for a multi-agent roundtable discussion.
///
/// The decision window shown to the moderator is bounded (recency
/// window); the transcript handed to the selected speaker is not.
pub struct MeetingController {
    topic: String,
    moderator_model: String,
    client: Arc<dyn LlmClient>,
    /// Join order; selection never reorders.
    roster: Vec<ConversationalAgent>,
    transcript: Vec<Message>,
}

impl MeetingController {
    pub fn new(client: Arc<dyn LlmClient>, moderator_model: impl Into<String>) -> Self {
        Self {
            topic: String::new(),
            moderator_model: moderator_model.into(),
            client,
            roster: Vec::new(),
            transcript: Vec::new(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn roster(&self) -> &[ConversationalAgent] {
        &self.roster
    }

    /// Start a new discussion: the transcript is replaced with a single
    /// opening message announcing the topic.
    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
        self.transcript = vec![Message::user(PromptTemplate::topic_announcement(&self.topic))];
        info!(topic = %self.topic, "meeting topic set");
    }

    /// Invite an agent. Join order is preserved; duplicate names are
    /// rejected because speaker selection matches by name.
    pub fn add_agent(&mut self, agent: ConversationalAgent) -> Result<(), DomainError> {
        if self.roster.iter().any(|a| a.name() == agent.name()) {
            return Err(DomainError::DuplicateAgentName(agent.name().to_string()));
        }
        self.roster.push(agent);
        Ok(())
    }

    /// Record a user contribution in the shared transcript.
    pub fn push_user_message(&mut self, text: impl Into<String>) {
        self.transcript.push(Message::user(text));
    }

    /// Decide who speaks next; returns a roster index.
    ///
    /// A single-member roster short-circuits without a model call. On a
    /// decision failure or an unmatchable reply the moderator degrades
    /// deterministically to the first roster member.
    pub async fn select_next_speaker(&self) -> usize {
        if self.roster.len() == 1 {
            return 0;
        }

        let profiles: Vec<SpeakerProfile> =
            self.roster.iter().map(ConversationalAgent::profile).collect();

        let window_start = self.transcript.len().saturating_sub(DECISION_WINDOW);
        let recent = self.transcript[window_start..]
            .iter()
            .map(|m| {
                format!(
                    "{}: {}",
                    m.role,
                    truncate_chars(m.content.text(), DECISION_SNIPPET_CHARS)
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = PromptTemplate::speaker_selection(&self.topic, &profiles, &recent);

        match self
            .client
            .complete(
                &self.moderator_model,
                &[Message::user(prompt)],
                CompletionOptions::default(),
            )
            .await
        {
            Ok(reply) => {
                let names: Vec<&str> = self.roster.iter().map(|a| a.name()).collect();
                match resolve_speaker(&reply, &names) {
                    Some(index) => {
                        debug!(speaker = names[index], "moderator selected speaker");
                        index
                    }
                    None => {
                        debug!(reply = %reply.trim(), "no roster name in moderator reply, using first member");
                        0
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "moderator decision failed, using first member");
                0
            }
        }
    }

    /// Advance the discussion by one round.
    ///
    /// The selected speaker sees the full untruncated transcript. A
    /// speaker-side model failure surfaces as the agent's inline error
    /// string and is still appended to the transcript as that agent's
    /// turn — visible to callers, never silently dropped.
    pub async fn step(&mut self) -> Result<Message, DomainError> {
        if self.roster.is_empty() {
            return Err(DomainError::EmptyRoster);
        }

        let index = self.select_next_speaker().await;
        let transcript_block = render_transcript(&self.transcript);
        let name = self.roster[index].name().to_string();
        let persona = self.roster[index].system_prompt().to_string();

        let prompt = PromptTemplate::speaking_turn(&transcript_block, &name, &persona);
        let reply = self.roster[index].chat(&prompt, None).await;

        let message = Message::spoken_by(name, reply);
        self.transcript.push(message.clone());
        Ok(message)
    }
}
