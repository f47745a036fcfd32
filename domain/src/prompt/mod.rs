//! Prompt templates for every model call in the system.
//!
//! Centralizing the templates keeps the orchestration code free of prompt
//! text and makes the decision policies reviewable in one place.

use crate::focus::insight::InsightNote;
use crate::meeting::roster::SpeakerProfile;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Opening transcript entry announcing a meeting topic.
    pub fn topic_announcement(topic: &str) -> String {
        format!(
            "Hello everyone. Today's topic is: {}. Please share your views in turn.",
            topic
        )
    }

    /// Moderator decision prompt: who speaks next.
    ///
    /// The policy is communicated to the model, not enforced in code; the
    /// reply is matched back onto the roster by name.
    pub fn speaker_selection(
        topic: &str,
        profiles: &[SpeakerProfile],
        recent_transcript: &str,
    ) -> String {
        let roster_block = profiles
            .iter()
            .map(|p| format!("- {}: {}", p.name, p.persona))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are moderating a research group meeting.

Current topic: {topic}
Participants:
{roster_block}

Recent conversation:
{recent_transcript}

Decide: which participant should speak next?
Rules:
1. If someone was addressed by name, pick them.
2. If the user asked a question without naming anyone, pick the participant who answered the user's previous turn.
3. If the topic touches someone's specialty, prefer them.
4. Avoid letting the same participant speak twice in a row.

Return only the participant's name, with no other characters."#
        )
    }

    /// Speaking prompt for the selected participant.
    pub fn speaking_turn(transcript_block: &str, name: &str, persona: &str) -> String {
        format!(
            r#"This is the meeting transcript so far:
{transcript_block}

It is your turn. As [{name}], drawing on your background ({persona}),
comment on the discussion.
Requirements:
1. Take a clear stance; you may push back on others.
2. You may challenge one participant by name and ask them to respond, but never more than one at a time.
3. If this is your first turn, introduce yourself and state your position.
4. If your reply exceeds 500 characters, end with a summary of at most 100 characters.
5. Do not restate points already made."#
        )
    }

    /// Background annotation prompt for one chunk of a focus turn.
    pub fn annotate_chunk(chunk: &str, topic: &str) -> String {
        format!(
            r#"You are an attentive note-taker. The other party is presenting this fragment: '{chunk}'.
The topic under discussion is [{topic}].
Task: record the deeper associations this fragment triggers, focusing on details relevant to [{topic}].
Requirements:
1. Strictly separate the original content from your own associations.
2. Never attribute your associations to the speaker.
3. Keep the association part within 50 characters.
4. Output exactly this shape:
   Core point: <brief restatement of the fragment's core point>
   My association: <your association, question, or extension, tied to '{topic}'>"#
        )
    }

    /// Selection prompt: pick 0-3 insight notes worth pursuing.
    pub fn select_insights(notes: &[InsightNote], topic: &str) -> String {
        let notes_block = notes
            .iter()
            .map(|n| format!("ID {}: {}", n.id, n.note))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"Review the background notes recorded so far:
{notes_block}

The topic under discussion is [{topic}].
Pick the 0-3 entry points most worth pursuing.
Requirements:
1. Always include a question the other party explicitly asked, if any.
2. Prefer the sharpest, most interesting, or most consequential details.
3. Drop notes that clearly drifted away from [{topic}].
4. Return only the chosen ID numbers as a list, e.g. [1, 3, 5], with no other text."#
        )
    }

    /// Response-generation prompt grounded in the selected point.
    pub fn focused_reply(
        topic: &str,
        confirmed: &[String],
        pending: &[String],
        selected_point: &str,
    ) -> String {
        format!(
            r#"The other party has just finished stating their view. Engage them in discussion.
The topic under discussion is [{topic}].

Confirmed consensus so far: {confirmed}
Pending consensus so far: {pending}

Task: reply based on the selected entry points below (each pairs a core point with an association):
{selected_point}

Connect the points into one natural, substantive response that stays on topic.
Constraints:
1. Keep straight what the other party said (core point) versus your own idea (association). Never present your association as their words.
2. If an entry point contains a question they explicitly asked, answer it first.
3. Speak conversationally; no "in summary" wrap-ups.
4. Take one firm stance; do not hedge.
5. You may cite existing consensus instead of re-litigating it.
6. You may propose 0-2 new pending-consensus candidates inline, in natural language.
7. Aim for 50-100 characters, never more than 200."#,
            confirmed = Self::render_statements(confirmed),
            pending = Self::render_statements(pending),
        )
    }

    /// Consensus-analysis prompt for the current turn.
    pub fn consensus_analysis(
        user_input: &str,
        ai_response: &str,
        history_block: &str,
        confirmed: &[String],
        pending: &[String],
    ) -> String {
        format!(
            r#"Analyze the conversation below and judge how consensus evolved.

Current turn:
User said: {user_input}
AI replied: {ai_response}

Recent history:
{history_block}

Confirmed consensus so far: {confirmed}
Pending consensus so far: {pending}

Task:
1. Check whether any pending consensus can now be promoted to confirmed.
2. Propose 0-2 new pending consensus points grounded in the current turn.
3. Judgement criteria:
   - Both parties explicitly state the same view or fact.
   - One party proposes a view and the other clearly agrees.
   - Never treat an assumption or speculation as consensus.
   - Never treat a one-sided statement as consensus.

Output JSON only: {{"confirmed": ["..."], "new_pending": ["..."]}}

A consensus statement must be something both parties clearly endorsed, with direct support in the conversation."#,
            confirmed = Self::render_statements(confirmed),
            pending = Self::render_statements(pending),
        )
    }

    /// System persona for the standalone report generator.
    pub fn report_editor_system() -> &'static str {
        "You are a professional academic editor who excels at turning meeting transcripts into structured minutes."
    }

    /// Report request embedding the transcript to summarize.
    pub fn report_request(context: &str, output_format: &str) -> String {
        format!(
            r#"Turn the conversation record below into structured research minutes.

[Conversation record]
{context}

[Requirements]
1. Use {output_format} format.
2. Include these sections:
   - Abstract: the core viewpoints
   - Discussion: the main disputes and how they unfolded, highlighting the user's questions and the conclusions reached
   - Conclusion: next steps or final takeaways
3. Be thorough and specific."#
        )
    }

    fn render_statements(statements: &[String]) -> String {
        if statements.is_empty() {
            "(none yet)".to_string()
        } else {
            statements
                .iter()
                .map(|s| format!("- {s}"))
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}
