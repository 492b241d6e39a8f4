// dual-style generation - one query, a casual and a formal completion

use crate::Error;
use crate::core::ai::CompletionClient;
use crate::core::prompt::Style;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Both completions for one query. Never partially filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPair {
    pub casual: String,
    pub formal: String,
}

#[derive(Clone)]
pub struct Generator {
    client: Arc<dyn CompletionClient>,
}

impl Generator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Casual first, then formal. The first failure aborts the whole pair.
    ///
    /// `user_id` only tags the logs; it never changes the prompts.
    pub async fn generate(&self, query: &str, user_id: &str) -> Result<GeneratedPair, Error> {
        let casual = self.complete(Style::Casual, query, user_id).await?;
        let formal = self.complete(Style::Formal, query, user_id).await?;

        Ok(GeneratedPair { casual, formal })
    }

    async fn complete(&self, style: Style, query: &str, user_id: &str) -> Result<String, Error> {
        let prompt = style.template().render(query);

        tracing::debug!(%style, user_id, model = self.model(), "requesting completion");

        match self.client.complete(&prompt).await {
            Ok(text) => Ok(text),
            Err(e) => {
                tracing::warn!(%style, user_id, error = %e, "completion failed");
                Err(Error::Generation {
                    style,
                    source: Box::new(e),
                })
            }
        }
    }
}
