use anyhow::{anyhow, Context};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::ActivityCollection;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a usable response.
    #[error("request failed: {0:#}")]
    Transport(#[from] anyhow::Error),
    /// The server answered with a non-success status.
    #[error("rejected with status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected {
        status: StatusCode,
        detail: Option<String>,
    },
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Classify a non-success response. A JSON body is the server talking, even
/// without a usable `detail` (validation errors carry a list there). Anything
/// else, such as a proxy's HTML error page, never reached the service.
fn rejection(status: StatusCode, text: &str) -> ApiError {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(body) => ApiError::Rejected {
            status,
            detail: body
                .get("detail")
                .and_then(|d| d.as_str())
                .map(str::to_string),
        },
        Err(e) => ApiError::Transport(anyhow!(
            "Unreadable error response (status {status}): {e}: {text}"
        )),
    }
}

#[derive(Clone)]
pub struct ActivitiesClient {
    client: Client,
    base_url: String,
}

impl ActivitiesClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn participant_url(&self, activity: &str, tail: &str, email: &str) -> String {
        format!(
            "{}/activities/{}/{}?email={}",
            self.base_url,
            urlencoding::encode(activity),
            tail,
            urlencoding::encode(email)
        )
    }

    /// Fetch the whole directory.
    pub async fn list_activities(&self) -> Result<ActivityCollection, ApiError> {
        let url = format!("{}/activities", self.base_url);

        let resp = self
            .client
            .get(&url)
            .headers(self.default_headers())
            .send()
            .await
            .context("Failed to fetch activities")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("Failed to read activities response")?;
        debug!("Activities response (status {}): {}", status, text);

        if !status.is_success() {
            return Err(rejection(status, &text));
        }

        let activities: ActivityCollection = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse activities (status {status}): {text}"))?;
        debug!("Fetched {} activities", activities.len());
        Ok(activities)
    }

    /// Register `email` for `activity`. Returns the server's confirmation text.
    pub async fn signup(&self, activity: &str, email: &str) -> Result<String, ApiError> {
        let url = self.participant_url(activity, "signup", email);
        self.send_mutation(Method::POST, &url, "signup").await
    }

    /// Remove `email` from `activity`. Returns the server's confirmation text.
    pub async fn unregister(&self, activity: &str, email: &str) -> Result<String, ApiError> {
        let url = self.participant_url(activity, "participants", email);
        self.send_mutation(Method::DELETE, &url, "unregister").await
    }

    async fn send_mutation(&self, method: Method, url: &str, what: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .request(method, url)
            .headers(self.default_headers())
            .send()
            .await
            .with_context(|| format!("Failed to send {what} request"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .with_context(|| format!("Failed to read {what} response"))?;
        debug!("{} response (status {}): {}", what, status, text);

        if !status.is_success() {
            return Err(rejection(status, &text));
        }

        let body: MessageBody = serde_json::from_str(&text).map_err(|e| {
            anyhow!("Failed to parse {what} response (status {status}): {e}: {text}")
        })?;
        Ok(body.message)
    }
}
