// http contract of the gateway, and a client for it

use crate::Error;
use crate::core::Exchange;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub query: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub id: Uuid,
    pub user_id: String,
    pub query: String,
    pub casual_response: String,
    pub formal_response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub user_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Talks to a running gateway over http.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate(&self, user_id: &str, query: &str) -> Result<GenerateResponse, Error> {
        let request = GenerateRequest {
            query: query.to_string(),
            user_id: user_id.to_string(),
        };

        let response = self
            .client
            .post(self.url(&["generate"])?)
            .timeout(GENERATE_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn history(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Exchange>, Error> {
        let response = self
            .client
            .get(self.url(&["history", user_id])?)
            .query(&[("limit", limit), ("offset", offset)])
            .timeout(READ_TIMEOUT)
            .send()
            .await?;

        Ok(check(response).await?.json().await?)
    }

    pub async fn users(&self) -> Result<Vec<String>, Error> {
        let response = self
            .client
            .get(self.url(&["users"])?)
            .timeout(READ_TIMEOUT)
            .send()
            .await?;

        let list: UserList = check(response).await?.json().await?;
        Ok(list.user_ids)
    }

    // path segments are percent-encoded, so user ids can hold any text
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, Error> {
        let invalid = || Error::Config(format!("invalid api url: {}", self.base_url));

        let mut url = reqwest::Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

// non-2xx becomes Error::Api, using the gateway's `detail` when present
async fn check(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.detail)
        .unwrap_or(body);

    Err(Error::Api {
        status: status.as_u16(),
        detail,
    })
}
