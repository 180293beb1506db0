//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the
//! appropriate commands.

pub mod model_list;

use clap::{Parser, Subcommand};

use crate::auth;
use crate::cli::model_list::list_models;
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "askemall")]
#[command(about = "Ask several LLMs the same question side by side")]
#[command(
    long_about = "Askemall is a full-screen terminal client that puts the same prompt to \
several LLMs through an aggregation API and shows their answers in per-model \
tabs next to an aggregate view.\n\n\
Authentication:\n\
  Use 'askemall auth' to store the aggregation API key in your system keyring,\n\
  or enter it in the in-app settings overlay (Ctrl+O).\n\n\
Environment Variables:\n\
  ASKEMALL_ENDPOINT  Aggregation service base URL (default http://localhost:7860)\n\
  ASKEMALL_LOG       Write internal diagnostics to this file\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message to the active tab's models\n\
  Tab               Switch between the input box and the model panel\n\
  Left/Right        Switch tabs\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+N            New chat\n\
  Ctrl+O            Open settings\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Aggregation service base URL, overriding config and environment
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Store the aggregation API credential in the system keyring
    Auth,
    /// Remove the stored credential
    Deauth,
    /// Start the chat interface (default)
    Chat,
    /// List the models the aggregation service offers
    Models,
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = Config::load()?;
    let endpoint = config.resolve_endpoint(args.endpoint.as_deref());

    match args.command {
        Some(Commands::Auth) => auth::interactive_auth(),
        Some(Commands::Deauth) => auth::deauth(),
        Some(Commands::Models) => list_models(&endpoint).await,
        Some(Commands::Chat) | None => run_chat(config, endpoint).await,
    }
}
