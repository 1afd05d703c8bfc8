/// Blocking Resource Graph REST client.
use serde::Deserialize;
use serde_json::{Value, json};

use super::errors::GraphError;
use super::session::Session;
use crate::types::ResultRecord;

/// ARM endpoint hosting the Resource Graph provider.
pub const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Resource Graph REST API version.
pub const API_VERSION: &str = "2021-03-01";

/// One page window: `top` records starting at zero-based offset `skip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub top: usize,
    pub skip: usize,
}

/// Where a query runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Only the given subscription.
    Subscription(String),
    /// Every subscription the caller can read.
    Tenant,
}

/// A service that executes a Resource Graph query for one page of records.
///
/// Returns between 0 and `page.top` records.
pub trait GraphQuery {
    /// Execute `query` for the given page window and scope.
    ///
    /// # Errors
    ///
    /// Returns `GraphError` on transport, auth, throttling or query failure.
    fn execute(&self, query: &str, page: Page, scope: &Scope)
    -> Result<Vec<ResultRecord>, GraphError>;
}

/// Resource Graph client bound to one session.
pub struct ResourceGraphClient {
    http: reqwest::blocking::Client,
    session: Session,
    endpoint: String,
}

impl ResourceGraphClient {
    /// Client against the public ARM endpoint.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Transport` if the HTTP client cannot be built.
    pub fn new(session: Session) -> Result<Self, GraphError> {
        Self::with_endpoint(session, MANAGEMENT_ENDPOINT)
    }

    /// Client against a custom ARM endpoint (sovereign clouds).
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Transport` if the HTTP client cannot be built.
    pub fn with_endpoint(session: Session, endpoint: &str) -> Result<Self, GraphError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("tagquery/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            session,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
        })
    }

    /// Resolve the scope for a run: tenant-wide, or the session's subscription.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::NoSubscription` when subscription scope is
    /// requested but the session has none.
    pub fn scope(&self, tenant: bool) -> Result<Scope, GraphError> {
        if tenant {
            return Ok(Scope::Tenant);
        }
        self.session
            .subscription_id()
            .map(|s| Scope::Subscription(s.to_owned()))
            .ok_or(GraphError::NoSubscription)
    }

    fn url(&self) -> String {
        format!(
            "{}/providers/Microsoft.ResourceGraph/resources?api-version={API_VERSION}",
            self.endpoint
        )
    }
}

impl GraphQuery for ResourceGraphClient {
    fn execute(
        &self,
        query: &str,
        page: Page,
        scope: &Scope,
    ) -> Result<Vec<ResultRecord>, GraphError> {
        let response = self
            .http
            .post(self.url())
            .bearer_auth(self.session.token())
            .json(&request_body(query, page, scope))
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(GraphError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        parse_page(&body)
    }
}

/// JSON request body for `POST .../resources`.
#[must_use]
pub fn request_body(query: &str, page: Page, scope: &Scope) -> Value {
    let mut body = json!({
        "query": query,
        "options": {
            "$top": page.top,
            "$skip": page.skip,
            "resultFormat": "objectArray",
        },
    });
    if let Scope::Subscription(id) = scope {
        body["subscriptions"] = json!([id]);
    }
    body
}

#[derive(Deserialize)]
struct QueryResponse {
    data: Vec<ResultRecord>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Decode the records from a successful response body.
///
/// # Errors
///
/// Returns `GraphError::Decode` if the body is not a Resource Graph result.
pub fn parse_page(body: &str) -> Result<Vec<ResultRecord>, GraphError> {
    let response: QueryResponse = serde_json::from_str(body)?;
    Ok(response.data)
}

/// Extract the ARM error message, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map_or_else(|_| body.trim().to_owned(), |e| e.error.message)
}
