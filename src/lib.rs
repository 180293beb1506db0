//! Askemall is a terminal client for putting the same question to several
//! remote LLMs at once, via an aggregation endpoint that fans the request out
//! and collects one reply per model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the model catalog, the per-model
//!   conversations, tab/selection state, and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//! - [`commands`] implements the slash commands available from the input box.
//! - [`api`] defines the wire payloads and the two gateway calls (list
//!   models, send a chat turn).
//! - [`auth`] stores the single API credential in the system keyring.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::run`], which dispatches into [`ui::chat_loop`] for
//! interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
