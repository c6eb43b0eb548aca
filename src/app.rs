use anyhow::{Context, Result};
use log::info;
use regex::Regex;

use crate::cli::{Cli, OperationMode};
use crate::config::ReportConfig;
use crate::gmail::api::MailProvider;
use crate::gmail::pager::query_threads_with_paging;
use crate::report::aggregate::aggregate;
use crate::report::filter::{LineFilter, MatchedLinesFromMessage};
use crate::report::rows::{AGGREGATED_HEADER, RAW_HEADER, to_aggregated_rows, to_rows};
use crate::report::table::print_table;
use crate::sheets::{GSheetOptions, GSheetWriter, SpreadsheetApi};

/// Effective report settings: config file values with CLI overrides.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub query: Option<String>,
    pub limit: Option<usize>,
    pub filter: LineFilter,
}

impl ReportSettings {
    pub fn resolve(report: &ReportConfig, cli: &Cli) -> Result<Self> {
        let pattern = cli.regex.as_deref().unwrap_or(&report.regex);
        let regex =
            Regex::new(pattern).with_context(|| format!("invalid line pattern '{pattern}'"))?;
        let limit = cli.limit.or(report.limit).filter(|l| *l > 0);
        let query = cli.query.clone().or_else(|| report.query.clone());
        let filter = LineFilter::new(regex, report.skip_lines_starting_with.clone())
            .with_line_sep(report.line_separator.clone())
            .with_mime_type(report.mime_type.clone());
        Ok(Self {
            query,
            limit,
            filter,
        })
    }
}

/// One run: query the mailbox, filter lines, report rows.
pub struct GmailReport<'a> {
    mode: OperationMode,
    settings: ReportSettings,
    provider: &'a dyn MailProvider,
    sheets: Option<&'a dyn SpreadsheetApi>,
}

impl<'a> GmailReport<'a> {
    pub fn new(
        mode: OperationMode,
        settings: ReportSettings,
        provider: &'a dyn MailProvider,
        sheets: Option<&'a dyn SpreadsheetApi>,
    ) -> Result<Self> {
        if matches!(mode, OperationMode::GSheet(_)) && sheets.is_none() {
            anyhow::bail!("GSHEET operation mode needs a spreadsheet client");
        }
        info!("Using operation mode: {mode}");
        Ok(Self {
            mode,
            settings,
            provider,
            sheets,
        })
    }

    pub fn start(&self) -> Result<Vec<MatchedLinesFromMessage>> {
        let result = query_threads_with_paging(
            self.provider,
            self.settings.query.as_deref(),
            self.settings.limit,
        )?;
        let matched = self.settings.filter.filter_messages(result.messages());
        self.process_data(&matched)?;
        Ok(matched)
    }

    pub fn process_data(&self, matched: &[MatchedLinesFromMessage]) -> Result<()> {
        let truncate = self.mode == OperationMode::Print;
        let rows = to_rows(matched, truncate);
        print_table(&RAW_HEADER, &rows);

        if let (OperationMode::GSheet(opts), Some(api)) = (&self.mode, self.sheets) {
            info!("Updating Google sheet with data...");
            let aggregated = to_aggregated_rows(&aggregate(matched));
            write_sheets(api, opts, &rows, &aggregated)?;
        }
        Ok(())
    }
}

fn write_sheets(
    api: &dyn SpreadsheetApi,
    opts: &GSheetOptions,
    rows: &[Vec<String>],
    aggregated: &[Vec<String>],
) -> Result<()> {
    GSheetWriter::new(api, opts.worksheet.clone()).write_data(&RAW_HEADER, rows, false)?;
    GSheetWriter::new(api, opts.aggregated().worksheet).write_data(
        &AGGREGATED_HEADER,
        aggregated,
        false,
    )?;
    Ok(())
}
