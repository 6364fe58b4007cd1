/*!
 * Listing progress reporting
 *
 * Observers are told about every fetched page. They only watch; nothing they
 * do feeds back into the listing.
 */

use crate::stats::BucketStats;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Snapshot taken after a page has been folded
#[derive(Debug, Clone)]
pub struct PageEvent<'a> {
    /// 1-based page number
    pub page: u64,
    pub entries: usize,
    pub truncated: bool,
    /// Cursor for the next request, rendered for display
    pub next: String,
    pub totals: &'a BucketStats,
}

pub trait ProgressObserver: Send + Sync {
    fn page_fetched(&self, event: &PageEvent<'_>);

    /// Called once when the listing stops, successfully or not
    fn finished(&self, _totals: &BucketStats) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn page_fetched(&self, _event: &PageEvent<'_>) {}
}

/// Terminal spinner plus one log line per page
pub struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    /// With `show_spinner` off only the log lines are emitted
    pub fn new(show_spinner: bool) -> Self {
        let bar = if show_spinner {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar.set_message("listing...");
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { bar }
    }
}

impl ProgressObserver for SpinnerProgress {
    fn page_fetched(&self, event: &PageEvent<'_>) {
        self.bar.suspend(|| {
            tracing::info!(
                page = event.page,
                entries = event.entries,
                items = event.totals.all.count(),
                truncated = event.truncated,
                next = %event.next,
                "fetched page"
            );
        });

        self.bar.set_message(format!(
            "page {} | {} items | {}",
            event.page,
            event.totals.all.count(),
            crate::report::human_bytes(event.totals.all.sum() as f64)
        ));
    }

    fn finished(&self, totals: &BucketStats) {
        self.bar.finish_and_clear();
        tracing::debug!(items = totals.all.count(), "listing finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::EntryRecord;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_page_log_carries_running_count() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let totals = ["a", "b", "c"]
            .iter()
            .fold(BucketStats::new(), |s, k| s.fold(&EntryRecord::object(*k, 1)));
        let event = PageEvent {
            page: 2,
            entries: 1,
            truncated: true,
            next: "marker=c".to_string(),
            totals: &totals,
        };

        tracing::subscriber::with_default(subscriber, || {
            SpinnerProgress::new(false).page_fetched(&event);
        });

        let out = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("fetched page"));
        assert!(out.contains("page=2"));
        assert!(out.contains("items=3"));
    }

    #[test]
    fn test_hidden_spinner_accepts_events() {
        let progress = SpinnerProgress::new(false);
        let totals = BucketStats::new().fold(&EntryRecord::object("a", 2048));
        let event = PageEvent {
            page: 1,
            entries: 1,
            truncated: false,
            next: "marker=<none>".to_string(),
            totals: &totals,
        };

        progress.page_fetched(&event);
        progress.finished(&totals);
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn test_no_progress_is_silent() {
        let totals = BucketStats::new();
        NoProgress.page_fetched(&PageEvent {
            page: 1,
            entries: 0,
            truncated: false,
            next: String::new(),
            totals: &totals,
        });
        NoProgress.finished(&totals);
    }
}
