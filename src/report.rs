/*!
 * Final listing report
 */

use crate::listing::ListingMode;
use crate::stats::{BucketStats, StatsSummary};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

const KIBIBYTE: f64 = 1024.0;
const MIBIBYTE: f64 = 1_048_576.0;
const GIBIBYTE: f64 = 1_073_741_824.0;
const TIBIBYTE: f64 = 1_099_511_627_776.0;

const NOT_COMPUTED: &str = "not computed";

/// Outcome of a listing run
#[derive(Debug, Clone, PartialEq)]
pub struct FinalReport {
    pub mode: ListingMode,
    pub bucket: String,
    pub stats: BucketStats,
    pub elapsed: Duration,
    /// Pages fetched, including the final untruncated one
    pub pages: u64,
    /// Set once the key file has been closed
    pub key_file: Option<PathBuf>,
}

impl FinalReport {
    pub fn new(mode: ListingMode, bucket: impl Into<String>) -> Self {
        Self {
            mode,
            bucket: bucket.into(),
            stats: BucketStats::new(),
            elapsed: Duration::ZERO,
            pages: 0,
            key_file: None,
        }
    }

    /// Items per whole elapsed second
    pub fn items_per_second(&self) -> Option<u64> {
        let count = self.stats.all.count();
        let secs = self.elapsed.as_secs();
        if count == 0 || secs == 0 {
            return None;
        }
        Some(count / secs)
    }

    pub fn document(&self) -> ReportDocument {
        ReportDocument {
            mode: self.mode,
            bucket: self.bucket.clone(),
            pages: self.pages,
            elapsed_ms: self.elapsed.as_millis(),
            items_per_second: self.items_per_second(),
            stats: self.stats.summary(),
            key_file: self.key_file.clone(),
        }
    }
}

/// JSON form of [`FinalReport`]
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub mode: ListingMode,
    pub bucket: String,
    pub pages: u64,
    pub elapsed_ms: u128,
    pub items_per_second: Option<u64>,
    pub stats: StatsSummary,
    pub key_file: Option<PathBuf>,
}

/// Render a byte count with binary units and three decimals
pub fn human_bytes(v: f64) -> String {
    if v < KIBIBYTE {
        format!("{:.3} B", v)
    } else if v < MIBIBYTE {
        format!("{:.3} KiB", v / KIBIBYTE)
    } else if v < GIBIBYTE {
        format!("{:.3} MiB", v / MIBIBYTE)
    } else if v < TIBIBYTE {
        format!("{:.3} GiB", v / GIBIBYTE)
    } else {
        format!("{:.3} TiB", v / TIBIBYTE)
    }
}

fn human_or_not_computed(v: Option<f64>) -> String {
    v.map(human_bytes)
        .unwrap_or_else(|| NOT_COMPUTED.to_string())
}

/// Plain text report
pub fn format_report(report: &FinalReport) -> String {
    let stats = &report.stats;
    let all = &stats.all;
    let mut out = String::new();

    let rate = report
        .items_per_second()
        .map(|r| format!("{} items/s", r))
        .unwrap_or_else(|| NOT_COMPUTED.to_string());

    // Writing into a String cannot fail
    let _ = writeln!(out, "------------------------");
    let _ = writeln!(
        out,
        "Processed {} items in {}ms ({})",
        all.count(),
        report.elapsed.as_millis(),
        rate
    );
    let _ = writeln!(
        out,
        "Item count: {}  Total Size: {}",
        all.count(),
        human_bytes(all.sum() as f64)
    );
    let _ = writeln!(
        out,
        "Min: {}  Max: {} Mean: {}",
        human_or_not_computed(all.min().map(|v| v as f64)),
        human_or_not_computed(all.max().map(|v| v as f64)),
        human_or_not_computed(all.mean().map(|v| v as f64)),
    );

    if report.mode == ListingMode::Versions {
        if stats.noncurrent.is_empty() {
            let _ = writeln!(out, "No versions found in bucket");
        } else {
            let _ = writeln!(
                out,
                "Found {} non-current versions ({} delete markers)",
                stats.noncurrent.count(),
                stats.delete_markers
            );
            let _ = writeln!(
                out,
                "Current versions: {} Non-current versions: {}",
                human_bytes(stats.current_bytes() as f64),
                human_bytes(stats.noncurrent_bytes() as f64)
            );
        }
    }

    if let Some(path) = &report.key_file {
        let qualifier = match report.mode {
            ListingMode::Objects => "",
            ListingMode::Versions => " (with version id)",
        };
        let _ = writeln!(
            out,
            "Wrote key names{} to file: {}",
            qualifier,
            path.display()
        );
    }

    out
}
