//! Focused exchange over long-form input

use super::AppContext;
use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scholar_application::ports::conversation_logger::ConversationEvent;
use scholar_application::ports::focus_progress::FocusProgress;
use scholar_application::ports::media::MediaCodec;
use scholar_application::ports::session_store::{SessionKind, SessionStore};
use scholar_application::use_cases::agent::is_failure_reply;
use scholar_application::use_cases::focus::{FocusOutcome, FocusSession};
use scholar_domain::InsightNote;
use scholar_infrastructure::BasicMediaCodec;
use std::path::Path;

/// Prints a line as each background annotation lands.
struct ConsoleProgress;

impl FocusProgress for ConsoleProgress {
    fn on_note_recorded(&self, notes: &[InsightNote]) {
        if let Some(note) = notes.last() {
            println!(
                "{}",
                format!("  note {} recorded ({} so far)", note.id, notes.len()).dimmed()
            );
        }
    }
}

pub async fn run(ctx: &AppContext, topic: &str, file: Option<&Path>) -> Result<()> {
    let mut session = FocusSession::new(
        ctx.client.clone(),
        ctx.config.provider.model.clone(),
        topic,
    )
    .with_max_chunk_len(ctx.config.focus.max_chunk_len);

    let codec = BasicMediaCodec;
    let session_id = ctx
        .store
        .create_session(topic, SessionKind::Focus)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!();
    println!("{}", format!("Focus session: {topic}").bold());
    println!("{}", "Paste input, /file <path> to load a file, /quit to exit.".dimmed());
    println!();

    if let Some(path) = file {
        let bytes = std::fs::read(path)?;
        let text = codec.extract_text(&bytes);
        process(ctx, &mut session, &session_id, &text).await;
    }

    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    "/quit" | "/exit" | "/q" => {
                        println!("Bye!");
                        break;
                    }
                    "/consensus" => {
                        print_consensus(
                            &session.consensus().confirmed,
                            &session.consensus().pending,
                        );
                        continue;
                    }
                    "/help" | "/h" | "/?" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                let text = if let Some(rest) = line.strip_prefix("/file ") {
                    match std::fs::read(rest.trim()) {
                        Ok(bytes) => codec.extract_text(&bytes),
                        Err(e) => {
                            eprintln!("{}", format!("Error: {e}").red());
                            continue;
                        }
                    }
                } else {
                    line.to_string()
                };

                process(ctx, &mut session, &session_id, &text).await;
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("Bye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

async fn process(ctx: &AppContext, session: &mut FocusSession, session_id: &str, text: &str) {
    let outcome = session.process_full_input(text, &ConsoleProgress).await;
    print_outcome(&outcome);

    for (role, content) in [("user", text), ("assistant", outcome.response.as_str())] {
        if let Err(e) = ctx.store.append_message(session_id, role, content).await {
            tracing::warn!(error = %e, "could not persist focus turn");
        }
    }
    if let Ok(payload) = serde_json::to_value(&outcome) {
        ctx.logger.log(ConversationEvent::focus_turn(payload));
    }
}

fn print_outcome(outcome: &FocusOutcome) {
    println!();
    println!(
        "{}",
        format!(
            "{} chunks, {} notes",
            outcome.chunk_count,
            outcome.insights.len()
        )
        .dimmed()
    );
    println!("{}", "Selected point:".cyan().bold());
    println!("{}", outcome.selected_point);
    println!();

    if is_failure_reply(&outcome.response) {
        println!("{}", outcome.response.red());
    } else {
        println!("{} {}", "Reply:".green().bold(), outcome.response);
    }
    println!();

    print_consensus(&outcome.confirmed_consensus, &outcome.pending_consensus);
}

fn print_consensus(confirmed: &[String], pending: &[String]) {
    println!("{}", "Consensus".bold());
    if confirmed.is_empty() && pending.is_empty() {
        println!("{}", "  (none yet)".dimmed());
        println!();
        return;
    }
    for statement in confirmed {
        println!("  {} {}", "[confirmed]".green(), statement);
    }
    for statement in pending {
        println!("  {} {}", "[pending]".yellow(), statement);
    }
    println!();
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  /file <path>     - Process a text file as the next input");
    println!("  /consensus       - Show the current consensus lists");
    println!("  /quit, /exit, /q - Exit the session");
    println!();
}
