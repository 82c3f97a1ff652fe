//! Task submission.

use std::time::Duration;

use serde::Deserialize;

use fieldtask_core::session::AuthSession;

use crate::encoder::Payload;
use crate::error::ApiError;

/// Submission endpoint path, relative to the configured base URL.
const SUBMIT_PATH: &str = "/admin/api/serviceman/submit";

/// Fallback message when a rejection body carries no `message`.
const GENERIC_SUBMIT_FAILURE: &str = "Failed to submit task";

/// HTTP timeouts for the submission request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// The task identifier. Server-issued when `server_assigned`, else
    /// a locally synthesized `local-{uuid}` placeholder.
    pub task_id: String,
    /// `false` when the backend accepted the task but returned no
    /// recognizable identifier. Synthesized ids are never authoritative
    /// for later lookup.
    pub server_assigned: bool,
}

/// Success body of the submission endpoint.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "taskId", default)]
    task_id: Option<String>,
}

/// Failure body of both endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Sends encoded payloads to the submission endpoint.
///
/// No retry happens here; retry is an explicit operator-triggered
/// re-submission. Callers must keep at most one submission in flight
/// per draft and disable further triggers until the result arrives.
pub struct SubmissionClient {
    http: reqwest::Client,
    base_url: String,
}

impl SubmissionClient {
    /// Client for a backend base URL, e.g. `http://localhost:3100`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_client(http, base_url)
    }

    /// Client reusing an existing [`reqwest::Client`] (connection
    /// pooling across submission and query).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Submit one payload on behalf of the authenticated technician.
    ///
    /// - 2xx with a `taskId` body: that id, `server_assigned: true`.
    /// - 2xx without a recognizable id: a synthesized `local-{uuid}`
    ///   id, `server_assigned: false`.
    /// - non-2xx: [`ApiError::Server`] with the body's `message` or the
    ///   generic fallback.
    /// - transport failure: [`ApiError::Network`].
    pub async fn submit(
        &self,
        payload: Payload,
        session: &AuthSession,
    ) -> Result<Submission, ApiError> {
        let image_count = payload.image_parts().len();
        tracing::info!(image_count, "Submitting task");

        let response = self
            .http
            .post(format!("{}{}", self.base_url, SUBMIT_PATH))
            .bearer_auth(session.bearer_token())
            .multipart(payload.into_form())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| GENERIC_SUBMIT_FAILURE.to_string());
            tracing::warn!(status = status.as_u16(), %message, "Task submission rejected");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        // Tolerant parse: the endpoint promises a JSON `taskId`, but an
        // accepted task without one still counts as submitted.
        match serde_json::from_str::<SubmitResponse>(&body)
            .ok()
            .and_then(|r| r.task_id)
        {
            Some(task_id) => {
                tracing::info!(%task_id, "Task submitted");
                Ok(Submission {
                    task_id,
                    server_assigned: true,
                })
            }
            None => {
                let task_id = format!("local-{}", uuid::Uuid::new_v4());
                tracing::warn!(
                    %task_id,
                    "Backend accepted the task without an identifier, synthesized one"
                );
                Ok(Submission {
                    task_id,
                    server_assigned: false,
                })
            }
        }
    }
}
