// HTTP client for the Blotto game service.
//
// The service is stateful: `POST /new_game` installs a game and `GET /solve_blotto`
// solves whichever game is installed, so the two calls must run in that order.

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Errors from one call to the game service. `Display` is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response; `message` is the body's `detail` or a generic status line.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The response body was not the expected JSON.
    #[error("{0}")]
    Decode(String),
}

/// Decoded `/solve_blotto` response.
///
/// The wire format is the positional array
/// `[solution_combo, win_prob, draw_prob, lose_prob, min_win_minus_lose_diff]`.
/// Missing trailing elements and `null`s decode to `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SolveResult {
    pub solution_combo: Option<Vec<f64>>,
    pub win_prob: Option<f64>,
    pub draw_prob: Option<f64>,
    pub lose_prob: Option<f64>,
    pub min_win_minus_lose_diff: Option<f64>,
}

impl SolveResult {
    pub fn from_json(value: &Value) -> Result<Self, ClientError> {
        let items = value.as_array().ok_or_else(|| {
            ClientError::Decode(format!("expected a JSON array from /solve_blotto, got {value}"))
        })?;
        Ok(SolveResult {
            solution_combo: element(items, 0, "solution_combo")?,
            win_prob: element(items, 1, "win_prob")?,
            draw_prob: element(items, 2, "draw_prob")?,
            lose_prob: element(items, 3, "lose_prob")?,
            min_win_minus_lose_diff: element(items, 4, "min_win_minus_lose_diff")?,
        })
    }
}

fn element<T: DeserializeOwned>(
    items: &[Value],
    index: usize,
    name: &str,
) -> Result<Option<T>, ClientError> {
    match items.get(index) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| ClientError::Decode(format!("invalid {name} in /solve_blotto response: {e}"))),
    }
}

/// Error message for a failed response: the JSON `detail` field if present,
/// otherwise `HTTP error! status: <code>`.
pub fn error_message(status: u16, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());
    match detail {
        Some(Value::String(s)) if !s.is_empty() => s,
        Some(Value::Null) | Some(Value::String(_)) | None => {
            format!("HTTP error! status: {status}")
        }
        Some(other) => other.to_string(),
    }
}

/// The two game service operations the presenter depends on.
#[async_trait]
pub trait GameService: Send + Sync {
    /// Install a new game. Values are forwarded verbatim; the service validates them.
    async fn new_game(&self, troops: &str, fields: &str) -> Result<(), ClientError>;

    /// Solve the game most recently installed.
    async fn solve_blotto(&self) -> Result<SolveResult, ClientError>;
}

/// [`GameService`] over HTTP.
#[derive(Clone)]
pub struct HttpGameService {
    client: Client,
    base_url: String,
}

impl HttpGameService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }
}

#[async_trait]
impl GameService for HttpGameService {
    async fn new_game(&self, troops: &str, fields: &str) -> Result<(), ClientError> {
        tracing::debug!("POST {}/new_game troops={troops} fields={fields}", self.base_url);
        let response = self
            .client
            .post(format!("{}/new_game", self.base_url))
            .query(&[("troops", troops), ("fields", fields)])
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn solve_blotto(&self) -> Result<SolveResult, ClientError> {
        tracing::debug!("GET {}/solve_blotto", self.base_url);
        let response = self
            .client
            .get(format!("{}/solve_blotto", self.base_url))
            .send()
            .await?;
        let response = Self::check(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("invalid JSON from /solve_blotto: {e}")))?;
        SolveResult::from_json(&body)
    }
}
