//! Voting API Client
//!
//! reqwest transport for the voting backend. HTTP 429 is turned into
//! [`VoteClientError::RateLimited`] so the retry coordinator can see it;
//! every other status comes back as an [`ApiResponse`] for classification.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, VoteClientError};
use crate::models::ApiResponse;

/// Header marking requests as issued by the client script, not a form post
pub const PROGRAMMATIC_HEADER: &str = "x-requested-with";
pub const PROGRAMMATIC_VALUE: &str = "XMLHttpRequest";

// == Endpoints ==
pub const STATUS_PATH: &str = "/api/status";
pub const COUNT_PATH: &str = "/api/count";
pub const HISTORY_PATH: &str = "/api/history";
pub const QUEUE_STATUS_PATH: &str = "/api/queue-status";
pub const SESSION_DEBUG_PATH: &str = "/api/session-debug";
pub const HEALTH_PATH: &str = "/api/health";
pub const VOTE_PATH: &str = "/api/vote";

// == Voting Api ==
#[derive(Debug, Clone)]
pub struct VotingApi {
    client: Client,
    base_url: String,
}

impl VotingApi {
    /// Builds the client from configuration.
    ///
    /// Fails with [`VoteClientError::InvalidConfig`] on an unparsable base URL.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| VoteClientError::InvalidConfig(format!("{}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(PROGRAMMATIC_HEADER, HeaderValue::from_static(PROGRAMMATIC_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| VoteClientError::InvalidConfig(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == Get ==
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(self.client.get(self.url(path))).await
    }

    // == Post ==
    pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiResponse> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        debug!(status = status.as_u16(), "Backend responded");

        let response = ApiResponse::new(status.as_u16(), body);
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(VoteClientError::RateLimited {
                status: response.status,
                message: response.error_message(),
                body: response.body,
            });
        }
        Ok(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
