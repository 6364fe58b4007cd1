/*!
 * Top-level listing run
 *
 * Owns the key file for the whole run: it is opened before the first request
 * and closed exactly once afterwards, whether the listing succeeded or not.
 */

use crate::config::SizerConfig;
use crate::error::Result;
use crate::listing::{ListingCursor, ListingDriver, ListingMode, PageSource};
use crate::progress::ProgressObserver;
use crate::protocol::s3::{ObjectPages, S3Client, VersionPages};
use crate::report::{human_bytes, FinalReport};
use crate::sink::{FileKeySink, KeySink};
use std::path::Path;

/// Size the configured bucket
pub async fn size_bucket(
    config: &SizerConfig,
    progress: &dyn ProgressObserver,
) -> Result<FinalReport> {
    let s3_config = config.s3_config()?;
    let bucket = s3_config.bucket.clone();
    let client = S3Client::new(s3_config).await?;
    let key_file = config.key_file.as_deref();

    match config.mode() {
        ListingMode::Objects => {
            let source = ObjectPages::new(&client, bucket, config.page_size);
            run_listing(&source, config.object_cursor(), key_file, progress).await
        }
        ListingMode::Versions => {
            let source = VersionPages::new(&client, bucket, config.page_size);
            run_listing(&source, config.version_cursor(), key_file, progress).await
        }
    }
}

/// Drive one listing, optionally writing tokens to `key_file`
pub async fn run_listing<C: ListingCursor>(
    source: &dyn PageSource<C>,
    start: C,
    key_file: Option<&Path>,
    progress: &dyn ProgressObserver,
) -> Result<FinalReport> {
    let sink = key_file.map(FileKeySink::create).transpose()?;
    run_with_sink(source, start, sink, progress).await
}

/// Drive one listing into an already opened sink.
///
/// The sink is finished exactly once after the driver returns, on success and
/// on failure alike.
pub async fn run_with_sink<C: ListingCursor, S: KeySink>(
    source: &dyn PageSource<C>,
    start: C,
    mut sink: Option<S>,
    progress: &dyn ProgressObserver,
) -> Result<FinalReport> {
    let driver = ListingDriver::new(source, progress);
    let outcome = driver
        .run(start, sink.as_mut().map(|s| s as &mut dyn KeySink))
        .await;

    let finished = sink.map(KeySink::finish).transpose().map(Option::flatten);

    match (outcome, finished) {
        (Ok(mut report), Ok(path)) => {
            report.key_file = path;
            Ok(report)
        }
        (Ok(_), Err(close_error)) => Err(close_error),
        (Err(failure), finished) => {
            if let Err(close_error) = finished {
                tracing::warn!(error = %close_error, "key file not closed cleanly after failed listing");
            }
            log_partial(&failure.partial);
            Err(failure.error)
        }
    }
}

fn log_partial(partial: &FinalReport) {
    let all = &partial.stats.all;
    tracing::warn!(
        bucket = %partial.bucket,
        pages = partial.pages,
        items = all.count(),
        total = %human_bytes(all.sum() as f64),
        elapsed_ms = partial.elapsed.as_millis() as u64,
        "listing aborted; partial statistics are incomplete"
    );
}
