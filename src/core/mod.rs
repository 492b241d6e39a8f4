// core logic - prompts, model backends, the dual-style pipeline, and storage

mod ai;
mod generator;
pub mod prompt;
mod store;
mod validate;

pub use ai::{Claude, CompletionClient, OpenAi, build_client};
pub use generator::{GeneratedPair, Generator};
pub use prompt::{Style, Template};
pub use store::{Exchange, Store};
pub use validate::{MAX_QUERY_CHARS, Validation};
