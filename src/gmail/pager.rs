use anyhow::{Context, Result};
use log::{info, warn};

use crate::domain::message::{Message, Thread};
use crate::gmail::api::{DEFAULT_PAGE_SIZE, ListThreadsRequest, MailProvider};
use crate::gmail::context::ConversionContext;
use crate::gmail::parser::parse_thread;
use crate::gmail::progress::ApiItemType;
use crate::gmail::reconciler::ReconcileReport;

/// Outcome of one query: the parsed threads plus the run's own state.
#[derive(Debug)]
pub struct ThreadQuery {
    pub threads: Vec<Thread>,
    pub context: ConversionContext,
    pub reconciled: ReconcileReport,
}

impl ThreadQuery {
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.threads.iter().flat_map(|t| t.messages.iter())
    }
}

/// Lists threads page by page until the provider stops returning a page
/// token or `limit` threads were listed. The last page is never cut short.
/// Every listed thread is fetched in full and parsed; pending attachment
/// bodies are resolved once at the end.
pub fn query_threads_with_paging(
    provider: &dyn MailProvider,
    query: Option<&str>,
    limit: Option<usize>,
) -> Result<ThreadQuery> {
    let mut ctx = ConversionContext::new(ApiItemType::Thread, limit);
    let max_results = limit.filter(|l| *l < DEFAULT_PAGE_SIZE);
    let mut threads = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = provider.list_threads(&ListThreadsRequest {
            query,
            page_token: page_token.as_deref(),
            max_results,
        })?;
        ctx.progress.incr_requests();
        ctx.progress.register_new_items(page.threads.len());

        for summary in &page.threads {
            ctx.progress.incr_processed_items();
            let detail = provider.get_thread(&summary.id)?;
            let thread = parse_thread(summary, &detail, &mut ctx)
                .with_context(|| format!("parsing thread {}", summary.id))?;
            threads.push(thread);
        }

        if ctx.progress.is_limit_reached() {
            warn!("Reached limit, stop processing more items.");
            break;
        }
        match page.next_page_token.filter(|t| !t.is_empty()) {
            Some(next) => page_token = Some(next),
            None => break,
        }
    }

    let reconciled = ctx.reconciler.resolve(provider)?;
    ctx.log_decode_failures();
    info!(
        "Query finished: {} thread(s) in {} request(s)",
        threads.len(),
        ctx.progress.requests_issued
    );

    Ok(ThreadQuery {
        threads,
        context: ctx,
        reconciled,
    })
}
