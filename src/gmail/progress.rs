use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiItemType {
    Thread,
    Message,
}

impl ApiItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ApiItemType::Thread => "thread",
            ApiItemType::Message => "message",
        }
    }
}

/// Counters of one pagination run.
#[derive(Debug, Clone)]
pub struct Progress {
    pub item_type: ApiItemType,
    pub limit: Option<usize>,
    pub requests_issued: usize,
    pub total_items_seen: usize,
    pub items_processed: usize,
    /// `None` until the first page arrives.
    pub items_in_last_page: Option<usize>,
}

impl Progress {
    pub fn new(item_type: ApiItemType, limit: Option<usize>) -> Self {
        Self {
            item_type,
            limit,
            requests_issued: 0,
            total_items_seen: 0,
            items_processed: 0,
            items_in_last_page: None,
        }
    }

    pub fn incr_requests(&mut self) {
        self.requests_issued += 1;
    }

    pub fn register_new_items(&mut self, count: usize) {
        self.total_items_seen += count;
        self.items_in_last_page = Some(count);
        info!(
            "[Request #: {}] Received {} more {}s",
            self.requests_issued,
            count,
            self.item_type.as_str()
        );
    }

    pub fn incr_processed_items(&mut self) {
        self.items_processed += 1;
        debug!(
            "Processing {}s: {} / {}",
            self.item_type.as_str(),
            self.items_processed,
            self.total_items_seen
        );
    }

    /// Whether enough items were listed to stop asking for more pages.
    pub fn is_limit_reached(&self) -> bool {
        match self.limit {
            Some(limit) => self.total_items_seen >= limit,
            None => false,
        }
    }
}
