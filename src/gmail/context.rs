use log::{error, info};

use crate::gmail::progress::{ApiItemType, Progress};
use crate::gmail::reconciler::MissingBodyReconciler;

/// Where an undecodable body was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub message_id: Option<String>,
    pub part_id: Option<String>,
    pub mime_type: Option<String>,
}

/// State of one query run. A fresh context is created per query so that
/// nothing leaks between runs.
#[derive(Debug)]
pub struct ConversionContext {
    pub progress: Progress,
    pub reconciler: MissingBodyReconciler,
    pub decode_failures: Vec<DecodeFailure>,
}

impl ConversionContext {
    pub fn new(item_type: ApiItemType, limit: Option<usize>) -> Self {
        Self {
            progress: Progress::new(item_type, limit),
            reconciler: MissingBodyReconciler::new(),
            decode_failures: Vec::new(),
        }
    }

    pub fn report_decode_failure(&mut self, failure: DecodeFailure) {
        self.decode_failures.push(failure);
    }

    pub fn log_decode_failures(&self) {
        if self.decode_failures.is_empty() {
            return;
        }
        info!(
            "{} message part(s) kept their original body data because it could not be decoded",
            self.decode_failures.len()
        );
        for f in &self.decode_failures {
            error!(
                "Undecodable body: message {:?}, part {:?}, mime type {:?}",
                f.message_id, f.part_id, f.mime_type
            );
        }
    }
}
