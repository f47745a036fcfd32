//! Interactive single-persona chat

use super::AppContext;
use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use scholar_application::ports::conversation_logger::ConversationEvent;
use scholar_application::ports::media::MediaCodec;
use scholar_application::ports::session_store::{SessionKind, SessionStore};
use scholar_application::use_cases::agent::{ConversationalAgent, is_failure_reply};
use scholar_domain::session::entities::render_transcript;
use scholar_infrastructure::BasicMediaCodec;
use std::path::Path;

pub async fn run(
    ctx: &AppContext,
    name: &str,
    persona: &str,
    model_override: Option<&str>,
) -> Result<()> {
    let model = model_override
        .map(str::to_string)
        .unwrap_or_else(|| ctx.config.provider.model.clone());

    let mut agent = ConversationalAgent::new(name, persona, &model, ctx.client.clone());
    let codec = BasicMediaCodec;

    let session_id = ctx
        .store
        .create_session(&format!("chat with {name}"), SessionKind::Chat)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    print_welcome(name, &model);

    let mut rl = DefaultEditor::new()?;
    let history_path = dirs::data_dir().map(|p| p.join("scholar-ai").join("history.txt"));
    if let Some(ref path) = history_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.load_history(path);
    }

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
                    "/clear" => {
                        agent.clear_memory();
                        println!("{}", "Memory cleared.".dimmed());
                        continue;
                    }
                    "/report" => {
                        let context = render_transcript(agent.memory());
                        let report = agent.summarize(&context, "markdown").await;
                        print_reply(name, &report);
                        continue;
                    }
                    "/help" | "/h" | "/?" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                let (text, image) = match parse_attachment(line, &codec) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        eprintln!("{}", format!("Error: {e}").red());
                        continue;
                    }
                };

                let reply = agent.chat(&text, image.as_deref()).await;
                print_reply(name, &reply);

                if !is_failure_reply(&reply) {
                    record_turn(ctx, &session_id, &text, name, &reply).await;
                }
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

    if let Some(ref path) = history_path {
        let _ = rl.save_history(path);
    }

    Ok(())
}

/// Expand `/file <path> [question]` and `/image <path> <question>` into
/// the outgoing (text, image) pair.
fn parse_attachment(line: &str, codec: &dyn MediaCodec) -> Result<(String, Option<String>)> {
    if let Some(rest) = line.strip_prefix("/file ") {
        let (path, question) = split_path_and_text(rest);
        let bytes = std::fs::read(Path::new(path))?;
        let content = codec.extract_text(&bytes);
        let text = if question.is_empty() {
            content
        } else {
            format!("{question}\n\n{content}")
        };
        return Ok((text, None));
    }

    if let Some(rest) = line.strip_prefix("/image ") {
        let (path, question) = split_path_and_text(rest);
        let bytes = std::fs::read(Path::new(path))?;
        let question = if question.is_empty() {
            "Describe this image."
        } else {
            question
        };
        return Ok((question.to_string(), Some(codec.encode_image(&bytes))));
    }

    Ok((line.to_string(), None))
}

fn split_path_and_text(rest: &str) -> (&str, &str) {
    match rest.split_once(char::is_whitespace) {
        Some((path, text)) => (path, text.trim()),
        None => (rest, ""),
    }
}

async fn record_turn(ctx: &AppContext, session_id: &str, user: &str, name: &str, reply: &str) {
    for (role, content) in [("user", user), (name, reply)] {
        if let Err(e) = ctx.store.append_message(session_id, role, content).await {
            tracing::warn!(error = %e, "could not persist chat turn");
        }
        ctx.logger.log(ConversationEvent::chat_turn(role, content));
    }
}

fn print_welcome(name: &str, model: &str) {
    println!();
    println!("{}", format!("Chat with {name} ({model})").bold());
    println!("{}", "Type /help for commands, /quit to exit.".dimmed());
    println!();
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  /file <path> [question]   - Send a text file as context");
    println!("  /image <path> <question>  - Ask about an image");
    println!("  /report                   - Generate a markdown report of the conversation");
    println!("  /clear                    - Reset conversation memory");
    println!("  /quit, /exit, /q          - Exit chat");
    println!();
}

fn print_reply(name: &str, reply: &str) {
    if is_failure_reply(reply) {
        println!("{}", reply.red());
    } else {
        println!("{} {}", format!("{name}:").cyan().bold(), reply);
    }
    println!();
}
