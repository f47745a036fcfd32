//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for scholar
#[derive(Parser, Debug)]
#[command(name = "scholar")]
#[command(author, version, about = "Multi-agent research discussion assistant")]
#[command(long_about = r#"
Scholar runs model-backed research discussions in three modes:

  chat     One persona with its own conversation memory
  meeting  A moderated roundtable where a moderator model picks who
           speaks each round
  focus    A focused exchange over long-form input: chunked, annotated
           in parallel, distilled into a reply, with an evolving
           consensus set tracked across turns

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./scholar.toml      Project-level config
3. ~/.config/scholar-ai/config.toml   Global config

Example:
  scholar chat
  scholar meeting --topic "Do attention heads specialize?"
  scholar focus --topic "survey review" --file survey.txt
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat with a single persona
    Chat {
        /// Persona name
        #[arg(long, default_value = "assistant")]
        name: String,

        /// Persona system prompt
        #[arg(long, default_value = "You are a careful research assistant.")]
        persona: String,

        /// Model override
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Moderated roundtable discussion with the configured roster
    Meeting {
        /// Discussion topic
        #[arg(short, long)]
        topic: String,

        /// Rounds to run automatically before handing over the prompt
        #[arg(long, default_value_t = 0)]
        auto_rounds: usize,
    },

    /// Focused exchange over long-form input
    Focus {
        /// Session topic
        #[arg(short, long)]
        topic: String,

        /// Read the first input from a file instead of the prompt
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Inspect stored sessions
    Sessions {
        #[command(subcommand)]
        command: SessionsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionsCommand {
    /// List stored sessions, newest first
    List,
    /// Print the message log of one session
    Show {
        /// Session id
        session_id: String,
    },
    /// Delete a session and its messages
    Delete {
        /// Session id
        session_id: String,
    },
}
