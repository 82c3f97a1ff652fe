//! Retrieval and search over the technician's submitted tasks.

use std::time::Duration;

use serde::Deserialize;

use fieldtask_core::session::AuthSession;
use fieldtask_core::submitted::SubmittedTask;

use crate::error::ApiError;
use crate::submit::ErrorBody;

/// Listing endpoint path, relative to the configured base URL.
const MY_TASKS_PATH: &str = "/admin/api/serviceman/my-tasks";

/// Fallback message when a listing failure body carries no `message`.
const GENERIC_FETCH_FAILURE: &str = "Failed to fetch tasks";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Ordering of the visible task list by creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recent first. The default.
    Newest,
    /// Oldest first.
    Oldest,
}

/// Success body of the listing endpoint.
#[derive(Debug, Deserialize)]
struct ListResponse {
    tasks: Vec<SubmittedTask>,
}

/// Fetches the technician's submitted tasks.
pub struct TaskQuery {
    http: reqwest::Client,
    base_url: String,
}

impl TaskQuery {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Retrieve the complete set of tasks submitted by the
    /// authenticated technician, as a [`TaskView`] in default order
    /// (most recent first).
    pub async fn fetch_all(&self, session: &AuthSession) -> Result<TaskView, ApiError> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, MY_TASKS_PATH))
            .bearer_auth(session.bearer_token())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
                .and_then(|b| b.message)
                .unwrap_or_else(|| GENERIC_FETCH_FAILURE.to_string());
            tracing::warn!(status = status.as_u16(), %message, "Task listing failed");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let list: ListResponse = response.json().await?;
        tracing::debug!(count = list.tasks.len(), "Fetched submitted tasks");
        Ok(TaskView::new(list.tasks))
    }
}

/// A searchable, sortable view over one fetched task set.
///
/// The view owns the fetched set and never mutates it: filtering and
/// sorting only change which subset [`visible`](Self::visible) derives
/// and in what order. Because the visible list is always recomputed as
/// filter-then-sort over the owned set, re-filtering after a sort
/// keeps the active order, and re-sorting after a filter touches only
/// the filtered subset.
#[derive(Debug, Clone)]
pub struct TaskView {
    tasks: Vec<SubmittedTask>,
    filter_term: String,
    order: SortOrder,
}

impl TaskView {
    pub fn new(tasks: Vec<SubmittedTask>) -> Self {
        Self {
            tasks,
            filter_term: String::new(),
            order: SortOrder::Newest,
        }
    }

    /// The full fetched set, untouched, in server order.
    pub fn tasks(&self) -> &[SubmittedTask] {
        &self.tasks
    }

    /// Case-insensitive substring filter against the organization name
    /// only. An empty or whitespace term clears the filter.
    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter_term = term.into();
    }

    pub fn clear_filter(&mut self) {
        self.filter_term.clear();
    }

    pub fn filter_term(&self) -> &str {
        &self.filter_term
    }

    /// Reorder the visible list by creation timestamp. Does not
    /// re-fetch.
    pub fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// The currently visible tasks: active filter applied first, then
    /// the active sort order.
    pub fn visible(&self) -> Vec<&SubmittedTask> {
        let term = self.filter_term.trim().to_lowercase();
        let mut visible: Vec<&SubmittedTask> = self
            .tasks
            .iter()
            .filter(|task| {
                term.is_empty() || task.organization_name.to_lowercase().contains(&term)
            })
            .collect();

        match self.order {
            SortOrder::Newest => visible.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => visible.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        visible
    }

    /// Number of tasks the active filter lets through.
    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    /// Size of the full fetched set.
    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }
}
