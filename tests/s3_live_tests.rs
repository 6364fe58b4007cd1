//! Live tests against an S3-compatible service
//!
//! Ignored by default. Set the following environment variables and run with
//! `--ignored`:
//!
//! - `S3_TESTS_ENABLED`: Set to "1" to enable these tests
//! - `S3_TEST_ENDPOINT`: Endpoint URL, e.g. `http://localhost:9000`
//! - `S3_TEST_BUCKET`: Existing bucket to list
//! - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`: Credentials
//! - `S3_TEST_SIGNATURE`: `v2` (default) or `v4`

use bucket_sizer::{
    config::SizerConfig,
    progress::NoProgress,
    protocol::s3::{S3Client, S3Config, SignatureVersion},
    runner,
};
use std::env;

fn s3_tests_enabled() -> bool {
    env::var("S3_TESTS_ENABLED").unwrap_or_default() == "1"
}

fn signature() -> SignatureVersion {
    match env::var("S3_TEST_SIGNATURE").as_deref() {
        Ok("v4") => SignatureVersion::V4,
        _ => SignatureVersion::V2,
    }
}

fn get_test_config() -> SizerConfig {
    SizerConfig {
        endpoint: env::var("S3_TEST_ENDPOINT").ok(),
        access_key: env::var("AWS_ACCESS_KEY_ID").ok(),
        secret_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
        bucket: env::var("S3_TEST_BUCKET").ok(),
        page_size: 2,
        signature: signature(),
        show_progress: false,
        ..Default::default()
    }
}

#[tokio::test]
#[ignore]
async fn test_list_first_page() {
    if !s3_tests_enabled() {
        println!("Skipping S3 live test - set S3_TESTS_ENABLED=1 to run");
        return;
    }

    let config: S3Config = get_test_config().s3_config().expect("incomplete test config");
    let bucket = config.bucket.clone();
    let client = S3Client::new(config).await.expect("Failed to create client");

    let page = client
        .list_objects_page(&bucket, 2, None)
        .await
        .expect("ListObjects failed");
    assert!(page.entries.len() <= 2);
}

#[tokio::test]
#[ignore]
async fn test_size_bucket_objects_and_versions() {
    if !s3_tests_enabled() {
        println!("Skipping S3 live test - set S3_TESTS_ENABLED=1 to run");
        return;
    }

    let mut config = get_test_config();
    config.no_versions = true;
    let objects = runner::size_bucket(&config, &NoProgress)
        .await
        .expect("object listing failed");

    config.no_versions = false;
    let versions = runner::size_bucket(&config, &NoProgress)
        .await
        .expect("version listing failed");

    // Every current object is also one of the listed versions
    assert!(versions.stats.all.count() >= objects.stats.all.count());
}
