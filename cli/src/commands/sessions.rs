//! Stored session inspection

use super::AppContext;
use crate::args::SessionsCommand;
use anyhow::Result;
use colored::Colorize;
use scholar_application::ports::session_store::SessionStore;

pub async fn run(ctx: &AppContext, command: SessionsCommand) -> Result<()> {
    match command {
        SessionsCommand::List => {
            let sessions = ctx.store.list_sessions().await.map_err(|e| anyhow::anyhow!(e))?;
            if sessions.is_empty() {
                println!("No stored sessions.");
                return Ok(());
            }
            for session in sessions {
                println!(
                    "{}  {}  {}  {}",
                    session.session_id.dimmed(),
                    format!("[{}]", session.kind).cyan(),
                    session.created_at,
                    session.title
                );
            }
        }
        SessionsCommand::Show { session_id } => {
            let Some(session) = ctx
                .store
                .get_session(&session_id)
                .await
                .map_err(|e| anyhow::anyhow!(e))?
            else {
                anyhow::bail!("no session with id {session_id}");
            };

            println!("{} ({})", session.title.bold(), session.kind);
            println!();
            let messages = ctx
                .store
                .list_messages(&session_id)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            for message in messages {
                println!("{} {}", format!("{}:", message.role).cyan(), message.content);
            }
        }
        SessionsCommand::Delete { session_id } => {
            ctx.store
                .delete_session(&session_id)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            println!("Deleted session {session_id}.");
        }
    }
    Ok(())
}
