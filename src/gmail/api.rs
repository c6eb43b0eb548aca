use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::auth::token_manager::TokenManager;

pub const USER_ID_ME: &str = "me";
pub const DEFAULT_PAGE_SIZE: usize = 100;
const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ThreadSummary {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(rename = "historyId", default)]
    pub history_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ThreadListPage {
    #[serde(default)]
    pub threads: Vec<ThreadSummary>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
    #[serde(rename = "resultSizeEstimate", default)]
    pub result_size_estimate: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListThreadsRequest<'a> {
    pub query: Option<&'a str>,
    pub page_token: Option<&'a str>,
    pub max_results: Option<usize>,
}

/// The calls the pagination driver and reconciler make against the mail
/// provider. Thread details and attachments are returned as raw records.
pub trait MailProvider {
    fn list_threads(&self, request: &ListThreadsRequest<'_>) -> Result<ThreadListPage>;
    fn get_thread(&self, thread_id: &str) -> Result<Value>;
    fn get_attachment(&self, message_id: &str, attachment_id: &str) -> Result<Value>;
}

pub struct GmailClient {
    http: Client,
    token_mgr: TokenManager,
    user_id: String,
}

impl GmailClient {
    pub fn new(token_mgr: TokenManager) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("gmail_report/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            token_mgr,
            user_id: USER_ID_ME.to_string(),
        })
    }

    fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let token = self.token_mgr.get_access_token()?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("Gmail API {url} returned {status}: {body}"));
        }
        Ok(resp.json()?)
    }
}

impl MailProvider for GmailClient {
    fn list_threads(&self, request: &ListThreadsRequest<'_>) -> Result<ThreadListPage> {
        let url = format!("{GMAIL_API_BASE}/{}/threads", self.user_id);
        let mut query = Vec::new();
        if let Some(q) = request.query {
            query.push(("q", q.to_string()));
        }
        if let Some(token) = request.page_token {
            query.push(("pageToken", token.to_string()));
        }
        if let Some(max) = request.max_results {
            query.push(("maxResults", max.to_string()));
        }
        let value = self.get_json(&url, &query)?;
        Ok(serde_json::from_value(value)?)
    }

    fn get_thread(&self, thread_id: &str) -> Result<Value> {
        let url = format!("{GMAIL_API_BASE}/{}/threads/{thread_id}", self.user_id);
        self.get_json(&url, &[("format", "full".to_string())])
    }

    fn get_attachment(&self, message_id: &str, attachment_id: &str) -> Result<Value> {
        let url = format!(
            "{GMAIL_API_BASE}/{}/messages/{message_id}/attachments/{attachment_id}",
            self.user_id
        );
        self.get_json(&url, &[])
    }
}
