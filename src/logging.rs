use anyhow::Result;
use flexi_logger::{
    Age, Cleanup, Criterion, DeferredNow, Duplicate, FileSpec, Logger, LoggerHandle, Naming,
    Record,
};
use std::path::PathBuf;

use crate::config::APP_NAME;

const KEEP_LOG_FILES: usize = 14;

pub fn log_dir() -> Result<PathBuf> {
    Ok(dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("no data dir available"))?
        .join(APP_NAME)
        .join("logs"))
}

/// `2024-01-01 10:00:00.123 - INFO - gmail_report::app - message`
pub fn log_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} - {} - {} - {}",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.target(),
        record.args()
    )
}

/// Debug and up to a file rotated at midnight, info (debug when verbose)
/// and up to stdout. Keep the handle alive for the whole run.
pub fn init_logger(console_debug: bool) -> Result<LoggerHandle> {
    let dir = log_dir()?;
    std::fs::create_dir_all(&dir)?;
    let duplicate = if console_debug {
        Duplicate::Debug
    } else {
        Duplicate::Info
    };
    let handle = Logger::try_with_str("debug")?
        .log_to_file(FileSpec::default().directory(dir).basename(APP_NAME))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .duplicate_to_stdout(duplicate)
        .format(log_format)
        .start()?;
    Ok(handle)
}
