pub mod client;

use anyhow::Result;
use log::info;

use crate::report::rows::Row;

pub const AGGREGATED_SUFFIX: &str = "_aggregated";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GSheetOptions {
    pub client_secret: std::path::PathBuf,
    pub spreadsheet: String,
    pub worksheet: String,
}

impl GSheetOptions {
    pub fn aggregated(&self) -> Self {
        Self {
            worksheet: format!("{}{}", self.worksheet, AGGREGATED_SUFFIX),
            ..self.clone()
        }
    }
}

pub trait SpreadsheetApi {
    fn write_rows(
        &self,
        worksheet: &str,
        header: &[String],
        rows: &[Row],
        clear_range: bool,
    ) -> Result<()>;
}

/// Writes to one worksheet of a spreadsheet.
pub struct GSheetWriter<'a> {
    api: &'a dyn SpreadsheetApi,
    worksheet: String,
}

impl<'a> GSheetWriter<'a> {
    pub fn new(api: &'a dyn SpreadsheetApi, worksheet: impl Into<String>) -> Self {
        Self {
            api,
            worksheet: worksheet.into(),
        }
    }

    pub fn worksheet(&self) -> &str {
        &self.worksheet
    }

    pub fn write_data<S: AsRef<str>>(
        &self,
        header: &[S],
        rows: &[Row],
        clear_range: bool,
    ) -> Result<()> {
        let header: Vec<String> = header.iter().map(|h| h.as_ref().to_string()).collect();
        info!(
            "Writing {} row(s) to worksheet '{}'",
            rows.len(),
            self.worksheet
        );
        self.api
            .write_rows(&self.worksheet, &header, rows, clear_range)
    }
}
