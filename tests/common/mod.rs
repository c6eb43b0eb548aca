#![allow(dead_code)]

use anyhow::{Result, anyhow};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

use gmail_report::gmail::api::{ListThreadsRequest, MailProvider, ThreadListPage, ThreadSummary};
use gmail_report::gmail::decoder::encode_base64url;
use gmail_report::report::rows::Row;
use gmail_report::sheets::SpreadsheetApi;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub query: Option<String>,
    pub page_token: Option<String>,
    pub max_results: Option<usize>,
}

/// Serves pre-built pages; page N+1 is reachable through token "page-N+1".
#[derive(Default)]
pub struct FakeProvider {
    pub pages: Vec<Vec<String>>,
    pub threads: HashMap<String, Value>,
    pub list_calls: RefCell<Vec<ListCall>>,
    pub thread_calls: RefCell<Vec<String>>,
    pub attachment_calls: RefCell<Vec<(String, String)>>,
}

impl FakeProvider {
    pub fn new(pages: Vec<Vec<Value>>) -> Self {
        let mut threads = HashMap::new();
        let mut ids = Vec::new();
        for page in pages {
            let mut page_ids = Vec::new();
            for t in page {
                let id = t["id"].as_str().unwrap().to_string();
                threads.insert(id.clone(), t);
                page_ids.push(id);
            }
            ids.push(page_ids);
        }
        Self {
            pages: ids,
            threads,
            ..Default::default()
        }
    }
}

impl MailProvider for FakeProvider {
    fn list_threads(&self, request: &ListThreadsRequest<'_>) -> Result<ThreadListPage> {
        self.list_calls.borrow_mut().push(ListCall {
            query: request.query.map(str::to_string),
            page_token: request.page_token.map(str::to_string),
            max_results: request.max_results,
        });
        let index = match request.page_token {
            None => 0,
            Some(t) => t.trim_start_matches("page-").parse()?,
        };
        let ids = self
            .pages
            .get(index)
            .ok_or_else(|| anyhow!("no page {index}"))?;
        let next = index + 1;
        Ok(ThreadListPage {
            threads: ids
                .iter()
                .map(|id| ThreadSummary {
                    id: id.clone(),
                    ..Default::default()
                })
                .collect(),
            next_page_token: (next < self.pages.len()).then(|| format!("page-{next}")),
            result_size_estimate: None,
        })
    }

    fn get_thread(&self, thread_id: &str) -> Result<Value> {
        self.thread_calls.borrow_mut().push(thread_id.to_string());
        self.threads
            .get(thread_id)
            .cloned()
            .ok_or_else(|| anyhow!("no thread {thread_id}"))
    }

    fn get_attachment(&self, message_id: &str, attachment_id: &str) -> Result<Value> {
        self.attachment_calls
            .borrow_mut()
            .push((message_id.to_string(), attachment_id.to_string()));
        Ok(json!({ "size": 4, "data": encode_base64url(b"blob") }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetWrite {
    pub worksheet: String,
    pub header: Vec<String>,
    pub rows: Vec<Row>,
    pub clear_range: bool,
}

#[derive(Default)]
pub struct FakeSheets {
    pub writes: RefCell<Vec<SheetWrite>>,
}

impl SpreadsheetApi for FakeSheets {
    fn write_rows(
        &self,
        worksheet: &str,
        header: &[String],
        rows: &[Row],
        clear_range: bool,
    ) -> Result<()> {
        self.writes.borrow_mut().push(SheetWrite {
            worksheet: worksheet.to_string(),
            header: header.to_vec(),
            rows: rows.to_vec(),
            clear_range,
        });
        Ok(())
    }
}

/// Epoch millis of 2023-01-`day` 12:00:00 UTC.
pub fn millis_on_day(day: i64) -> i64 {
    (1_672_531_200 + (day - 1) * 86_400 + 12 * 3600) * 1000
}

pub fn report_message(id: &str, thread_id: &str, day: i64, body: &str) -> Value {
    json!({
        "id": id,
        "threadId": thread_id,
        "snippet": "YARN Daily unit test report",
        "internalDate": millis_on_day(day).to_string(),
        "payload": {
            "partId": "",
            "mimeType": "multipart/mixed",
            "headers": [
                { "name": "Received", "value": "by mx" },
                { "name": "Subject", "value": "YARN Daily unit test report" }
            ],
            "body": { "size": 0 },
            "parts": [
                {
                    "partId": "0",
                    "mimeType": "multipart/alternative",
                    "body": { "size": 0 },
                    "parts": [
                        {
                            "partId": "0.0",
                            "mimeType": "text/plain",
                            "body": { "size": body.len(), "data": encode_base64url(body.as_bytes()) }
                        },
                        {
                            "partId": "0.1",
                            "mimeType": "text/html",
                            "body": { "size": 5, "data": encode_base64url(b"<p/>") }
                        }
                    ]
                },
                {
                    "partId": "1",
                    "mimeType": "text/plain",
                    "filename": "report.txt",
                    "body": { "size": 4096, "attachmentId": format!("att-{id}") }
                }
            ]
        }
    })
}

pub fn thread(id: &str, messages: Vec<Value>) -> Value {
    json!({ "id": id, "messages": messages })
}

pub fn simple_thread(id: &str) -> Value {
    thread(id, vec![report_message(&format!("{id}-m"), id, 1, "nothing")])
}
