use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use crate::auth::token_manager::TokenManager;
use crate::report::rows::Row;
use crate::sheets::SpreadsheetApi;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Google Sheets v4 values client for a single spreadsheet.
pub struct SheetsClient {
    http: Client,
    token_mgr: TokenManager,
    spreadsheet_id: String,
}

impl SheetsClient {
    pub fn new(token_mgr: TokenManager, spreadsheet_id: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("gmail_report/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            token_mgr,
            spreadsheet_id: spreadsheet_id.into(),
        })
    }

    /// `{base}/{spreadsheet_id}{method}/{tail..}`; `method` is e.g. `:batchUpdate`.
    fn url(&self, method: &str, tail: &[&str]) -> Result<Url> {
        let mut url = Url::parse(SHEETS_API_BASE)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("cannot-be-a-base url: {SHEETS_API_BASE}"))?;
            segments.push(&format!("{}{method}", self.spreadsheet_id));
            for t in tail {
                segments.push(t);
            }
        }
        Ok(url)
    }

    fn send(&self, req: RequestBuilder, what: &str) -> Result<Value> {
        let token = self.token_mgr.get_access_token()?;
        let resp = req
            .bearer_auth(token)
            .send()
            .with_context(|| format!("Sheets API {what}"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(anyhow!("Sheets API {what} returned {status}: {body}"));
        }
        Ok(resp.json()?)
    }

    fn sheet_titles(&self) -> Result<Vec<String>> {
        let mut url = self.url("", &[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let value = self.send(self.http.get(url), "get spreadsheet")?;
        let meta: SpreadsheetMeta = serde_json::from_value(value)?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    fn ensure_worksheet(&self, worksheet: &str) -> Result<()> {
        if self.sheet_titles()?.iter().any(|t| t == worksheet) {
            return Ok(());
        }
        info!("Creating worksheet '{worksheet}'");
        let url = self.url(":batchUpdate", &[])?;
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": worksheet } } }]
        });
        self.send(self.http.post(url).json(&body), "add sheet")?;
        Ok(())
    }

    fn clear(&self, range: &str) -> Result<()> {
        let url = self.url("", &["values", &format!("{range}:clear")])?;
        self.send(self.http.post(url).json(&json!({})), "clear range")?;
        Ok(())
    }
}

fn a1_range(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

impl SpreadsheetApi for SheetsClient {
    fn write_rows(
        &self,
        worksheet: &str,
        header: &[String],
        rows: &[Row],
        clear_range: bool,
    ) -> Result<()> {
        self.ensure_worksheet(worksheet)?;
        let sheet = a1_range(worksheet);
        if clear_range {
            self.clear(&sheet)?;
        }

        let mut values: Vec<&[String]> = Vec::with_capacity(rows.len() + 1);
        values.push(header);
        values.extend(rows.iter().map(Vec::as_slice));

        let range = format!("{sheet}!A1");
        let mut url = self.url("", &["values", &range])?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });
        let resp = self.send(self.http.put(url).json(&body), "update values")?;
        debug!(
            "Updated {} cell(s) in '{}'",
            resp.get("updatedCells").and_then(Value::as_u64).unwrap_or(0),
            worksheet
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_worksheet_names() {
        assert_eq!(a1_range("Report"), "'Report'");
        assert_eq!(a1_range("Bob's"), "'Bob''s'");
    }
}
