/*!
 * Pagination driver
 *
 * Walks a listing page by page until the server reports a page that is not
 * truncated. Every entry is folded into the statistics exactly once and, when
 * a sink is attached, written to it right after.
 */

use super::{ListingCursor, Page, PageSource};
use crate::error::SizerError;
use crate::progress::{PageEvent, ProgressObserver};
use crate::report::FinalReport;
use crate::sink::KeySink;
use std::time::Instant;
use thiserror::Error;

/// Where the listing stands after a page
#[derive(Debug)]
pub enum DriverState<C> {
    /// Another request is needed, starting at this cursor
    Fetching(C),
    Done,
    Failed(SizerError),
}

impl<C: ListingCursor> DriverState<C> {
    /// Decide the next state from a fetched page
    pub fn after_page(page: &Page<C>) -> Self {
        if !page.truncated {
            return DriverState::Done;
        }

        if page.next.has_marker() {
            return DriverState::Fetching(page.next.clone());
        }

        match page.entries.last() {
            Some(last) => {
                let next = C::fallback(last);
                if C::MODE == super::ListingMode::Versions {
                    tracing::warn!(
                        resume = %next,
                        "truncated version page without a key marker, resuming after last key"
                    );
                } else {
                    tracing::debug!(resume = %next, "no next marker, resuming after last key");
                }
                DriverState::Fetching(next)
            }
            None => DriverState::Failed(SizerError::ProtocolViolation(
                "server returned an empty truncated page without a continuation marker"
                    .to_string(),
            )),
        }
    }
}

/// A listing that stopped early
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ListingFailure {
    pub error: SizerError,
    /// Statistics gathered before the failure
    pub partial: FinalReport,
}

/// Sequential page walker over a [`PageSource`]
pub struct ListingDriver<'a, C: ListingCursor> {
    source: &'a dyn PageSource<C>,
    progress: &'a dyn ProgressObserver,
}

impl<'a, C: ListingCursor> ListingDriver<'a, C> {
    pub fn new(source: &'a dyn PageSource<C>, progress: &'a dyn ProgressObserver) -> Self {
        Self { source, progress }
    }

    /// Walk the listing from `start` until it completes or fails.
    ///
    /// The sink is neither opened nor closed here; the caller owns it.
    pub async fn run(
        &self,
        start: C,
        mut sink: Option<&mut dyn KeySink>,
    ) -> Result<FinalReport, ListingFailure> {
        let started = Instant::now();
        let mut report = FinalReport::new(C::MODE, self.source.bucket());
        let mut state = DriverState::Fetching(start);

        tracing::info!(bucket = %report.bucket, mode = %report.mode, "starting listing");

        let outcome = loop {
            let cursor = match state {
                DriverState::Fetching(cursor) => cursor,
                DriverState::Done => break Ok(()),
                DriverState::Failed(error) => break Err(error),
            };

            tracing::debug!(page = report.pages + 1, cursor = %cursor, "requesting page");
            let page = match self.source.fetch(&cursor).await {
                Ok(page) => page,
                Err(error) => break Err(error),
            };
            report.pages += 1;

            if let Err(error) = self.consume(&page, &mut report, sink.as_deref_mut()) {
                break Err(error);
            }

            self.progress.page_fetched(&PageEvent {
                page: report.pages,
                entries: page.entries.len(),
                truncated: page.truncated,
                next: page.next.to_string(),
                totals: &report.stats,
            });

            state = DriverState::after_page(&page);
        };

        report.elapsed = started.elapsed();
        self.progress.finished(&report.stats);

        match outcome {
            Ok(()) => {
                tracing::info!(
                    pages = report.pages,
                    items = report.stats.all.count(),
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "listing complete"
                );
                Ok(report)
            }
            Err(error) => Err(ListingFailure {
                error,
                partial: report,
            }),
        }
    }

    fn consume<'s>(
        &self,
        page: &Page<C>,
        report: &mut FinalReport,
        mut sink: Option<&mut (dyn KeySink + 's)>,
    ) -> crate::error::Result<()> {
        for entry in &page.entries {
            report.stats = report.stats.fold(entry);
            if let Some(sink) = sink.as_deref_mut() {
                sink.write_token(&entry.last_key_token())?;
            }
        }
        Ok(())
    }
}
