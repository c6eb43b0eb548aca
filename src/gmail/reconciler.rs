use anyhow::Result;
use log::{debug, error, info};

use crate::domain::message::MessagePartBody;
use crate::gmail::api::MailProvider;

/// A part whose body was not inline and has to be fetched separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBody {
    pub message_id: Option<String>,
    pub attachment_id: Option<String>,
    pub part_id: Option<String>,
    pub body: MessagePartBody,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub fetched: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct MissingBodyReconciler {
    pending: Vec<PendingBody>,
}

impl MissingBodyReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        message_id: Option<&str>,
        part_id: Option<&str>,
        body: &MessagePartBody,
    ) {
        self.pending.push(PendingBody {
            message_id: message_id.map(str::to_string),
            attachment_id: body.attachment_id.clone(),
            part_id: part_id.map(str::to_string),
            body: body.clone(),
        });
    }

    pub fn pending(&self) -> &[PendingBody] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Issues one attachment request per pending entry. Entries without both
    /// keys are logged and skipped. The fetched content is not merged back
    /// into the parsed tree.
    pub fn resolve(&mut self, provider: &dyn MailProvider) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();
        for entry in self.pending.drain(..) {
            let (Some(message_id), Some(attachment_id)) =
                (entry.message_id.as_deref(), entry.attachment_id.as_deref())
            else {
                error!(
                    "Both message id and attachment id have to be set to query attachment details. Entry was: {:?}",
                    entry
                );
                report.skipped += 1;
                continue;
            };
            let attachment = provider.get_attachment(message_id, attachment_id)?;
            debug!(
                "Fetched attachment {} of message {} ({} bytes reported)",
                attachment_id,
                message_id,
                attachment.get("size").and_then(|s| s.as_u64()).unwrap_or(0)
            );
            report.fetched += 1;
        }
        if report.fetched + report.skipped > 0 {
            info!(
                "Reconciled missing bodies: {} fetched, {} skipped",
                report.fetched, report.skipped
            );
        }
        Ok(report)
    }
}
