use crate::core::Style;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{op} failed: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("{style} completion failed: {source}")]
    Generation {
        style: Style,
        #[source]
        source: Box<Error>,
    },

    #[error("Missing API key for {0}. Set it with --api-key or the provider's environment variable")]
    MissingApiKey(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    // wrap a sqlx error with the store operation that produced it
    pub(crate) fn store(op: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Store { op, source }
    }
}
