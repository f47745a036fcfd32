//! Focus session use case.
//!
//! One focus turn runs a five-stage pipeline over a long-form input:
//! chunk, annotate all chunks in parallel, select the salient notes,
//! generate a focused reply, then analyze and merge consensus. Every
//! stage degrades on failure; nothing aborts the pipeline.

use crate::ports::focus_progress::FocusProgress;
use crate::ports::llm_client::{CompletionOptions, LlmClient};
use crate::use_cases::agent::FAILURE_MARKER;
use scholar_domain::focus::chunk::DEFAULT_MAX_CHUNK_LEN;
use scholar_domain::focus::insight::NO_SELECTED_POINT;
use scholar_domain::{
    ConsensusDelta, ConsensusState, InsightNote, Message, PromptTemplate, build_selected_point,
    chunk_text, extract_note_ids, parse_consensus_delta, truncate_chars,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// How many recorded turns the consensus analysis sees.
const HISTORY_WINDOW: usize = 3;
/// Per-field character cap inside the history window.
const HISTORY_SNIPPET_CHARS: usize = 100;

/// One recorded (input, response) exchange.
#[derive(Debug, Clone, Serialize)]
pub struct FocusTurn {
    pub user: String,
    pub ai: String,
}

/// Result of processing one full input.
#[derive(Debug, Clone, Serialize)]
pub struct FocusOutcome {
    pub chunk_count: usize,
    /// Notes in completion order, not chunk order.
    pub insights: Vec<InsightNote>,
    pub selected_point: String,
    pub response: String,
    pub consensus_delta: ConsensusDelta,
    pub confirmed_consensus: Vec<String>,
    pub pending_consensus: Vec<String>,
}

/// A focused long-form exchange with consensus bookkeeping.
///
/// `insight_notes` is reset at the start of every turn; the consensus
/// lists persist and accumulate for the session's lifetime.
pub struct FocusSession {
    topic: String,
    model: String,
    client: Arc<dyn LlmClient>,
    max_chunk_len: usize,
    insight_notes: Vec<InsightNote>,
    consensus: ConsensusState,
    history: Vec<FocusTurn>,
}

impl FocusSession {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            model: model.into(),
            client,
            max_chunk_len: DEFAULT_MAX_CHUNK_LEN,
            insight_notes: Vec::new(),
            consensus: ConsensusState::new(),
            history: Vec::new(),
        }
    }

    pub fn with_max_chunk_len(mut self, max_chunk_len: usize) -> Self {
        self.max_chunk_len = max_chunk_len;
        self
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn consensus(&self) -> &ConsensusState {
        &self.consensus
    }

    pub fn history(&self) -> &[FocusTurn] {
        &self.history
    }

    /// Run the full pipeline over one input.
    pub async fn process_full_input(
        &mut self,
        text: &str,
        progress: &dyn FocusProgress,
    ) -> FocusOutcome {
        self.insight_notes.clear();

        // Stage 1: chunking
        let chunks = chunk_text(text, self.max_chunk_len);
        info!(chunks = chunks.len(), "focus turn started");

        // Stage 2: parallel annotation
        self.annotate_chunks(&chunks, progress).await;

        // Stage 3: selection
        let selected_point = self.select_insight().await;

        // Stage 4: response generation
        let response = self.generate_response(&selected_point).await;

        // Record the turn before consensus analysis: the history window
        // it sees includes the current exchange.
        self.history.push(FocusTurn {
            user: text.to_string(),
            ai: response.clone(),
        });

        // Stage 5: consensus analysis and merge
        let delta = self.analyze_consensus(text, &response).await;
        self.consensus.apply(&delta);

        FocusOutcome {
            chunk_count: chunks.len(),
            insights: self.insight_notes.clone(),
            selected_point,
            response,
            consensus_delta: delta,
            confirmed_consensus: self.consensus.confirmed.clone(),
            pending_consensus: self.consensus.pending.clone(),
        }
    }

    /// Launch one annotation call per chunk and collect completions.
    ///
    /// All calls are issued before any is awaited so their latencies
    /// overlap; notes are appended in completion order. A failed chunk
    /// records its failure reason as the note instead of aborting its
    /// siblings.
    async fn annotate_chunks(&mut self, chunks: &[String], progress: &dyn FocusProgress) {
        let mut join_set = JoinSet::new();

        for (id, chunk) in chunks.iter().enumerate() {
            let client = Arc::clone(&self.client);
            let model = self.model.clone();
            let topic = self.topic.clone();
            let chunk = chunk.clone();

            join_set.spawn(async move {
                let prompt = PromptTemplate::annotate_chunk(&chunk, &topic);
                let result = client
                    .complete(&model, &[Message::user(prompt)], CompletionOptions::default())
                    .await;
                (id, chunk, result)
            });
        }

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((id, chunk, Ok(note))) => {
                    debug!(chunk_id = id, "annotation completed");
                    self.insight_notes
                        .push(InsightNote::new(id, chunk, note.trim()));
                }
                Ok((id, chunk, Err(e))) => {
                    warn!(chunk_id = id, error = %e, "annotation failed");
                    self.insight_notes.push(InsightNote::new(
                        id,
                        chunk,
                        format!("{FAILURE_MARKER} annotation failed: {e}"),
                    ));
                }
                Err(e) => {
                    warn!(error = %e, "annotation task join error");
                }
            }
            progress.on_note_recorded(&self.insight_notes);
        }
    }

    /// Pick the 0-3 notes worth pursuing and assemble the selected point.
    ///
    /// Degrades to the most recently appended note when the reply parses
    /// to no usable ids or the call fails; to the literal placeholder
    /// when there are no notes at all.
    async fn select_insight(&self) -> String {
        if self.insight_notes.is_empty() {
            return NO_SELECTED_POINT.to_string();
        }

        let last_note = || {
            self.insight_notes
                .last()
                .map(|n| n.note.clone())
                .unwrap_or_else(|| NO_SELECTED_POINT.to_string())
        };

        let prompt = PromptTemplate::select_insights(&self.insight_notes, &self.topic);
        match self
            .client
            .complete(
                &self.model,
                &[Message::user(prompt)],
                CompletionOptions::default(),
            )
            .await
        {
            Ok(reply) => {
                let ids = extract_note_ids(&reply);
                match build_selected_point(&self.insight_notes, &ids) {
                    Some(point) => point,
                    None => {
                        debug!(reply = %reply.trim(), "no usable ids in selection reply, using latest note");
                        last_note()
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "selection failed, using latest note");
                last_note()
            }
        }
    }

    async fn generate_response(&self, selected_point: &str) -> String {
        let prompt = PromptTemplate::focused_reply(
            &self.topic,
            &self.consensus.confirmed,
            &self.consensus.pending,
            selected_point,
        );

        match self
            .client
            .complete(
                &self.model,
                &[Message::user(prompt)],
                CompletionOptions::default(),
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "response generation failed");
                format!("{FAILURE_MARKER} reply generation failed: {e}")
            }
        }
    }

    /// Analyze the current turn for consensus movement.
    ///
    /// Requests strict JSON output (best-effort) and degrades to an
    /// empty delta on any call or parse failure.
    async fn analyze_consensus(&self, user_input: &str, ai_response: &str) -> ConsensusDelta {
        let window_start = self.history.len().saturating_sub(HISTORY_WINDOW);
        let history_block = self.history[window_start..]
            .iter()
            .enumerate()
            .map(|(i, turn)| {
                format!(
                    "Turn {}:\nUser: {}...\nAI: {}...\n",
                    i + 1,
                    truncate_chars(&turn.user, HISTORY_SNIPPET_CHARS),
                    truncate_chars(&turn.ai, HISTORY_SNIPPET_CHARS),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = PromptTemplate::consensus_analysis(
            user_input,
            ai_response,
            &history_block,
            &self.consensus.confirmed,
            &self.consensus.pending,
        );

        match self
            .client
            .complete(&self.model, &[Message::user(prompt)], CompletionOptions::json())
            .await
        {
            Ok(reply) => parse_consensus_delta(&reply).unwrap_or_else(|e| {
                warn!(error = %e, "consensus reply unparseable, no consensus change");
                ConsensusDelta::empty()
            }),
            Err(e) => {
                warn!(error = %e, "consensus analysis failed, no consensus change");
                ConsensusDelta::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::focus_progress::NoFocusProgress;
    use crate::ports::llm_client::ModelCallError;
    use crate::use_cases::agent::is_failure_reply;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers by prompt content so the test stays deterministic under
    /// unspecified annotation completion order.
    struct MatcherClient {
        rules: Vec<(&'static str, Result<String, String>)>,
        calls: Mutex<Vec<String>>,
    }

    impl MatcherClient {
        fn new(rules: Vec<(&'static str, Result<String, String>)>) -> Arc<Self> {
            Arc::new(Self {
                rules,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmClient for MatcherClient {
        async fn complete(
            &self,
            _model: &str,
            messages: &[Message],
            _options: CompletionOptions,
        ) -> Result<String, ModelCallError> {
            let prompt = messages.last().map(|m| m.content.text()).unwrap_or("");
            self.calls.lock().unwrap().push(prompt.to_string());
            for (pattern, reply) in &self.rules {
                if prompt.contains(pattern) {
                    return reply.clone().map_err(ModelCallError::Transport);
                }
            }
            panic!("no rule matched prompt: {prompt}");
        }
    }

    /// Records each progress callback's note count.
    struct CountingProgress {
        counts: Mutex<Vec<usize>>,
    }

    impl FocusProgress for CountingProgress {
        fn on_note_recorded(&self, notes: &[InsightNote]) {
            self.counts.lock().unwrap().push(notes.len());
        }
    }

    const DELTA_NONE: &str = r#"{"confirmed": [], "new_pending": []}"#;

    #[tokio::test]
    async fn test_two_chunks_one_annotation_failure() {
        // Two chunks; the chunk containing "second" fails to annotate.
        // Stage-specific patterns come first: the consensus prompt embeds
        // the raw input, so chunk patterns must not shadow it.
        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("[0]".to_string())),
            ("finished stating their view", Ok("a focused reply".to_string())),
            ("judge how consensus evolved", Ok(DELTA_NONE.to_string())),
            ("first sentence", Ok("Core point: first\nMy association: a".to_string())),
            ("second sentence", Err("boom".to_string())),
        ]);
        let mut session = FocusSession::new(client, "m", "topic").with_max_chunk_len(5);

        let outcome = session
            .process_full_input("first sentence here. second sentence here.", &NoFocusProgress)
            .await;

        assert_eq!(outcome.chunk_count, 2);
        assert_eq!(outcome.insights.len(), 2);
        let failed: Vec<_> = outcome
            .insights
            .iter()
            .filter(|n| is_failure_reply(&n.note))
            .collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].note.contains("boom"));
        // Selection proceeds with the successful note's id
        assert!(outcome.selected_point.starts_with("[point 0]"));
        assert_eq!(outcome.response, "a focused reply");
    }

    #[tokio::test]
    async fn test_empty_input_yields_placeholder_point() {
        let client = MatcherClient::new(vec![
            ("finished stating their view", Ok("still replying".to_string())),
            ("judge how consensus evolved", Ok(DELTA_NONE.to_string())),
        ]);
        let mut session = FocusSession::new(client.clone(), "m", "topic");

        let outcome = session.process_full_input("   ", &NoFocusProgress).await;

        assert_eq!(outcome.chunk_count, 0);
        assert!(outcome.insights.is_empty());
        assert_eq!(outcome.selected_point, NO_SELECTED_POINT);
        // No annotation or selection calls were made
        let calls = client.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
    }

    #[tokio::test]
    async fn test_selection_parse_failure_falls_back_to_latest_note() {
        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("I cannot decide.".to_string())),
            ("finished stating their view", Ok("r".to_string())),
            ("judge how consensus evolved", Ok(DELTA_NONE.to_string())),
            ("only sentence", Ok("the only note".to_string())),
        ]);
        let mut session = FocusSession::new(client, "m", "topic");

        let outcome = session
            .process_full_input("only sentence.", &NoFocusProgress)
            .await;

        assert_eq!(outcome.selected_point, "the only note");
    }

    #[tokio::test]
    async fn test_consensus_promotion_through_pipeline() {
        let confirmed_delta =
            r#"{"confirmed": ["the method generalizes well"], "new_pending": []}"#;
        let pending_delta =
            r#"{"confirmed": [], "new_pending": ["the method generalizes well"]}"#;

        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("[0]".to_string())),
            ("finished stating their view", Ok("reply".to_string())),
            ("judge how consensus evolved", Ok(pending_delta.to_string())),
            ("input text", Ok("a note".to_string())),
        ]);
        let mut session = FocusSession::new(client, "m", "topic");

        session
            .process_full_input("input text one.", &NoFocusProgress)
            .await;
        assert_eq!(
            session.consensus().pending,
            vec!["the method generalizes well"]
        );

        // Second turn promotes the pending statement
        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("[0]".to_string())),
            ("finished stating their view", Ok("reply".to_string())),
            ("judge how consensus evolved", Ok(confirmed_delta.to_string())),
            ("input text", Ok("a note".to_string())),
        ]);
        session.client = client;

        let outcome = session
            .process_full_input("input text two.", &NoFocusProgress)
            .await;

        assert_eq!(
            outcome.confirmed_consensus,
            vec!["the method generalizes well"]
        );
        assert!(outcome.pending_consensus.is_empty());
    }

    #[tokio::test]
    async fn test_consensus_failure_degrades_to_empty_delta() {
        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("[0]".to_string())),
            ("finished stating their view", Ok("reply".to_string())),
            ("judge how consensus evolved", Err("down".to_string())),
            ("input", Ok("note".to_string())),
        ]);
        let mut session = FocusSession::new(client, "m", "topic");

        let outcome = session.process_full_input("input.", &NoFocusProgress).await;

        assert!(outcome.consensus_delta.is_empty());
        assert!(outcome.confirmed_consensus.is_empty());
    }

    #[tokio::test]
    async fn test_progress_called_per_completion() {
        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("[0, 1]".to_string())),
            ("finished stating their view", Ok("reply".to_string())),
            ("judge how consensus evolved", Ok(DELTA_NONE.to_string())),
            ("alpha", Ok("note a".to_string())),
            ("bravo", Ok("note b".to_string())),
        ]);
        let mut session = FocusSession::new(client, "m", "topic").with_max_chunk_len(4);
        let progress = CountingProgress {
            counts: Mutex::new(Vec::new()),
        };

        session
            .process_full_input("alpha one. bravo two.", &progress)
            .await;

        // One callback per completion, each seeing the partial set grow.
        // Completion order is unspecified, so only the counts are checked.
        assert_eq!(*progress.counts.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_history_recorded_before_consensus_analysis() {
        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("[0]".to_string())),
            ("finished stating their view", Ok("the reply".to_string())),
            ("judge how consensus evolved", Ok(DELTA_NONE.to_string())),
            ("input", Ok("note".to_string())),
        ]);
        let mut session = FocusSession::new(client.clone(), "m", "topic");

        session.process_full_input("input.", &NoFocusProgress).await;

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].ai, "the reply");
        // The consensus prompt's history window already contains the
        // current turn.
        let calls = client.calls.lock().unwrap();
        let consensus_prompt = calls
            .iter()
            .find(|c| c.contains("judge how consensus evolved"))
            .unwrap();
        assert!(consensus_prompt.contains("Turn 1:"));
        assert!(consensus_prompt.contains("the reply"));
    }

    #[tokio::test]
    async fn test_insight_notes_reset_each_turn() {
        let client = MatcherClient::new(vec![
            ("Review the background notes", Ok("[0]".to_string())),
            ("finished stating their view", Ok("reply".to_string())),
            ("judge how consensus evolved", Ok(DELTA_NONE.to_string())),
            ("input", Ok("note".to_string())),
        ]);
        let mut session = FocusSession::new(client, "m", "topic");

        let first = session.process_full_input("input one.", &NoFocusProgress).await;
        let second = session.process_full_input("input two.", &NoFocusProgress).await;

        assert_eq!(first.insights.len(), 1);
        assert_eq!(second.insights.len(), 1);
    }
}
