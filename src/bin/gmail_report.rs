use anyhow::{Result, anyhow};
use clap::Parser;
use log::info;
use std::time::Instant;

use gmail_report::app::{GmailReport, ReportSettings};
use gmail_report::auth::ServiceType;
use gmail_report::auth::credentials::ClientCredentials;
use gmail_report::auth::token_manager::TokenManager;
use gmail_report::cli::{Cli, OperationMode};
use gmail_report::config::load_config;
use gmail_report::gmail::api::GmailClient;
use gmail_report::logging::init_logger;
use gmail_report::sheets::SpreadsheetApi;
use gmail_report::sheets::client::SheetsClient;

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();
    let mode = cli.operation_mode()?;
    let _logger = init_logger(cli.verbose)?;

    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let user_email = cfg
        .user_email
        .clone()
        .ok_or_else(|| anyhow!("user_email not set in config"))?;
    let settings = ReportSettings::resolve(&cfg.report, &cli)?;

    let gmail_tokens = TokenManager::new(
        ServiceType::Gmail,
        ClientCredentials::from_config(&cfg)?,
        cfg.redirect_uri(),
        user_email.clone(),
    );
    let gmail = GmailClient::new(gmail_tokens)?;

    let sheets = match &mode {
        OperationMode::GSheet(opts) => {
            let sheet_tokens = TokenManager::new(
                ServiceType::Sheets,
                ClientCredentials::from_file(&opts.client_secret)?,
                cfg.redirect_uri(),
                user_email,
            );
            Some(SheetsClient::new(sheet_tokens, opts.spreadsheet.clone())?)
        }
        OperationMode::Print => None,
    };

    let report = GmailReport::new(
        mode,
        settings,
        &gmail,
        sheets.as_ref().map(|s| s as &dyn SpreadsheetApi),
    )?;
    report.start()?;

    info!(
        "Execution of script took {} seconds",
        start.elapsed().as_secs()
    );
    Ok(())
}
