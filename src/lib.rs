// twintone library - one question, a casual and a formal answer

pub mod api;
pub mod cli;
pub mod config;
mod core;
mod error;
mod output;
mod server;
pub mod tui;

pub use crate::core::{
    Claude, CompletionClient, Exchange, GeneratedPair, Generator, MAX_QUERY_CHARS, OpenAi, Store,
    Style, Template, Validation, build_client, prompt,
};
pub use error::Error;
pub use server::Server;
