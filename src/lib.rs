/*!
 * bucket-sizer - size statistics for S3 buckets
 *
 * Walks an S3 (or S3-compatible) bucket through its paginated listing API,
 * one page at a time, and keeps running statistics in constant memory:
 * - object count, total, min, max and mean size
 * - current vs non-current bytes and delete markers when listing versions
 * - optional key file with one listed key (and version id) per line
 */

pub mod config;
pub mod error;
pub mod listing;
pub mod logging;
pub mod output;
pub mod progress;
pub mod protocol;
pub mod report;
pub mod runner;
pub mod sink;
pub mod stats;

// Re-export commonly used types
pub use config::SizerConfig;
pub use error::{Result, SizerError};
pub use listing::{EntryRecord, ListingMode, ObjectCursor, Page, PageSource, VersionCursor};
pub use report::FinalReport;
pub use stats::{BucketStats, RunningStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
