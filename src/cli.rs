use anyhow::{Result, anyhow};
use clap::{ArgGroup, Parser};
use std::fmt;
use std::path::PathBuf;

use crate::sheets::GSheetOptions;

#[derive(Parser, Debug)]
#[command(name = "gmail_report")]
#[command(
    about = "Collect failing testcases from report mails and print them or push them to a spreadsheet",
    long_about = None
)]
#[command(group(ArgGroup::new("mode").required(true).args(["print", "gsheet"])))]
pub struct Cli {
    /// More verbose console log
    #[arg(short, long)]
    pub verbose: bool,

    /// Print results to console
    #[arg(short, long)]
    pub print: bool,

    /// Export values to a Google sheet (requires the --gsheet-* arguments)
    #[arg(
        short,
        long,
        requires_all = ["gsheet_client_secret", "gsheet_spreadsheet", "gsheet_worksheet"]
    )]
    pub gsheet: bool,

    /// Client credentials for accessing the Google Sheets API
    #[arg(long, help_heading = "Google sheet")]
    pub gsheet_client_secret: Option<PathBuf>,

    /// Id of the spreadsheet
    #[arg(long, help_heading = "Google sheet")]
    pub gsheet_spreadsheet: Option<String>,

    /// Name of the worksheet in the spreadsheet
    #[arg(long, help_heading = "Google sheet")]
    pub gsheet_worksheet: Option<String>,

    /// Mail search query, overrides the config file
    #[arg(long)]
    pub query: Option<String>,

    /// Line pattern, overrides the config file
    #[arg(long)]
    pub regex: Option<String>,

    /// Max number of threads to list, 0 for no limit
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationMode {
    Print,
    GSheet(GSheetOptions),
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationMode::Print => write!(f, "PRINT"),
            OperationMode::GSheet(_) => write!(f, "GSHEET"),
        }
    }
}

impl Cli {
    pub fn operation_mode(&self) -> Result<OperationMode> {
        if self.print {
            return Ok(OperationMode::Print);
        }
        if self.gsheet {
            let (Some(client_secret), Some(spreadsheet), Some(worksheet)) = (
                self.gsheet_client_secret.clone(),
                self.gsheet_spreadsheet.clone(),
                self.gsheet_worksheet.clone(),
            ) else {
                return Err(anyhow!(
                    "--gsheet requires --gsheet-client-secret, --gsheet-spreadsheet and --gsheet-worksheet."
                ));
            };
            return Ok(OperationMode::GSheet(GSheetOptions {
                client_secret,
                spreadsheet,
                worksheet,
            }));
        }
        Err(anyhow!(
            "Unknown operation mode! Use either --print or --gsheet"
        ))
    }
}
