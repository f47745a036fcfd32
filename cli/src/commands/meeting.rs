//! Moderated roundtable discussion

use super::AppContext;
use anyhow::{Result, bail};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scholar_application::ports::conversation_logger::ConversationEvent;
use scholar_application::ports::session_store::{SessionKind, SessionStore};
use scholar_application::use_cases::agent::{ConversationalAgent, is_failure_reply};
use scholar_application::use_cases::meeting::MeetingController;
use scholar_domain::session::entities::render_transcript;

pub async fn run(ctx: &AppContext, topic: &str, auto_rounds: usize) -> Result<()> {
    if ctx.config.roster.is_empty() {
        bail!("no agents configured; add [[roster]] entries to scholar.toml");
    }

    let mut controller =
        MeetingController::new(ctx.client.clone(), ctx.config.provider.model.clone());

    for entry in &ctx.config.roster {
        let agent = ConversationalAgent::new(
            &entry.name,
            &entry.persona,
            ctx.config.model_for(entry),
            ctx.client.clone(),
        );
        controller
            .add_agent(agent)
            .map_err(|e| anyhow::anyhow!(e))?;
    }

    controller.set_topic(topic);

    let session_id = ctx
        .store
        .create_session(topic, SessionKind::Meeting)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    print_welcome(topic, &ctx.config);

    for _ in 0..auto_rounds {
        advance(ctx, &mut controller, &session_id).await?;
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
                    "/next" | "/n" => {
                        advance(ctx, &mut controller, &session_id).await?;
                        continue;
                    }
                    "/report" => {
                        let context = render_transcript(controller.transcript());
                        let report = controller.roster()[0].summarize(&context, "markdown").await;
                        println!("{report}");
                        println!();
                        continue;
                    }
                    "/help" | "/h" | "/?" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                controller.push_user_message(line);
                if let Err(e) = ctx.store.append_message(&session_id, "user", line).await {
                    tracing::warn!(error = %e, "could not persist user message");
                }
                ctx.logger.log(ConversationEvent::chat_turn("user", line));

                advance(ctx, &mut controller, &session_id).await?;
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

/// Run one round and print, persist, and log the resulting turn.
async fn advance(
    ctx: &AppContext,
    controller: &mut MeetingController,
    session_id: &str,
) -> Result<()> {
    let message = controller.step().await.map_err(|e| anyhow::anyhow!(e))?;
    let text = message.content.text();

    if is_failure_reply(text) {
        println!("{}", text.red());
    } else {
        println!("{} {}", format!("{}:", message.role).green().bold(), text);
    }
    println!();

    if let Err(e) = ctx.store.append_message(session_id, &message.role, text).await {
        tracing::warn!(error = %e, "could not persist meeting turn");
    }
    ctx.logger
        .log(ConversationEvent::meeting_turn(&message.role, text));

    Ok(())
}

fn print_welcome(topic: &str, config: &scholar_infrastructure::FileConfig) {
    println!();
    println!("{}", format!("Meeting: {topic}").bold());
    println!(
        "Participants: {}",
        config
            .roster
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("{}", "Speak, or /next to let the discussion continue.".dimmed());
    println!();
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  /next, /n        - Let the moderator pick the next speaker");
    println!("  /report          - Generate a markdown report of the discussion");
    println!("  /quit, /exit, /q - Exit the meeting");
    println!();
}
