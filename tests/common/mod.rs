// shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use twintone::{CompletionClient, Error, Generator, Server, Store};

/// Completion client that replays canned replies and records every prompt.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Arc<Self> {
        let replies = replies
            .into_iter()
            .map(|r| r.map(str::to_string).map_err(str::to_string))
            .collect();

        Arc::new(Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Answers every prompt with `casual`/`formal` based on the template.
    pub fn echo() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => reply.map_err(Error::Completion),
            // no script: answer by style so endless calls work
            None if prompt.contains("academic") => Ok("formal answer".to_string()),
            None => Ok("casual answer".to_string()),
        }
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// File-backed sqlite store in a temp dir; keep the dir alive for the test.
pub async fn temp_store() -> (Store, TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("history.db").display());
    let store = Store::connect(&url).await.unwrap();
    (store, dir, url)
}

/// Serve the gateway on an ephemeral port and return its base url.
pub async fn spawn_gateway(client: Arc<ScriptedClient>, store: Store) -> String {
    let app = Server::router(Generator::new(client), store);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Small pause so consecutive inserts get distinct timestamps.
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
}
