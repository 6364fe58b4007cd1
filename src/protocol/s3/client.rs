//! S3 client implementation

use super::config::{S3Config, SignatureVersion};
use super::error::{S3Error, S3Result};
use super::signer::SigV2Interceptor;
use crate::listing::{EntryRecord, ObjectCursor, Page, VersionCursor};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::operation::list_object_versions::ListObjectVersionsOutput;
use aws_sdk_s3::operation::list_objects::ListObjectsOutput;
use aws_sdk_s3::primitives::DateTime;
use aws_sdk_s3::Client as AwsS3Client;

/// S3 client for listing buckets on AWS S3 and S3-compatible storage
#[derive(Clone)]
pub struct S3Client {
    /// AWS S3 client
    client: AwsS3Client,
}

impl S3Client {
    /// Create a new S3 client with the given configuration
    pub async fn new(config: S3Config) -> S3Result<Self> {
        config.validate()?;

        let client = Self::build_aws_client(&config).await;
        tracing::debug!(
            endpoint = %config.endpoint,
            signature = %config.signature,
            max_attempts = config.max_attempts,
            "built S3 client"
        );

        Ok(Self { client })
    }

    /// Build the AWS SDK S3 client from configuration
    async fn build_aws_client(config: &S3Config) -> AwsS3Client {
        AwsS3Client::from_conf(sdk_builder(config).await.build())
    }

    /// Fetch one ListObjects (v1) page
    pub async fn list_objects_page(
        &self,
        bucket: &str,
        max_keys: u32,
        marker: Option<&str>,
    ) -> S3Result<Page<ObjectCursor>> {
        let output = self
            .client
            .list_objects()
            .bucket(bucket)
            .max_keys(clamp_page_size(max_keys))
            .set_marker(marker.map(str::to_string))
            .send()
            .await
            .map_err(|e| S3Error::from(e).context(format!("ListObjects on '{}'", bucket)))?;

        Ok(object_page(&output))
    }

    /// Fetch one ListObjectVersions page
    pub async fn list_versions_page(
        &self,
        bucket: &str,
        max_results: u32,
        key_marker: Option<&str>,
        version_id_marker: Option<&str>,
    ) -> S3Result<Page<VersionCursor>> {
        let output = self
            .client
            .list_object_versions()
            .bucket(bucket)
            .max_keys(clamp_page_size(max_results))
            .set_key_marker(key_marker.map(str::to_string))
            .set_version_id_marker(version_id_marker.map(str::to_string))
            .send()
            .await
            .map_err(|e| S3Error::from(e).context(format!("ListObjectVersions on '{}'", bucket)))?;

        Ok(version_page(&output))
    }
}

/// SDK configuration with static credentials and every setting applied
async fn sdk_builder(config: &S3Config) -> aws_sdk_s3::config::Builder {
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .credentials_provider(static_credentials(config))
        .load()
        .await;

    configure(aws_sdk_s3::config::Builder::from(&aws_config), config)
}

fn static_credentials(config: &S3Config) -> Credentials {
    Credentials::new(
        &config.access_key,
        &config.secret_key,
        None,
        None,
        "bucket-sizer-explicit",
    )
}

/// Addressing, retry, timeout and signing settings on top of `builder`
fn configure(
    builder: aws_sdk_s3::config::Builder,
    config: &S3Config,
) -> aws_sdk_s3::config::Builder {
    let mut timeout_config = TimeoutConfig::builder();
    if let Some(read_timeout) = config.read_timeout() {
        timeout_config = timeout_config.read_timeout(read_timeout);
    }

    let builder = builder
        .endpoint_url(&config.endpoint)
        .force_path_style(config.force_path_style)
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts))
        .timeout_config(timeout_config.build());

    match config.signature {
        SignatureVersion::V2 => builder.interceptor(SigV2Interceptor::new(
            &config.access_key,
            &config.secret_key,
        )),
        SignatureVersion::V4 => builder,
    }
}

fn clamp_page_size(size: u32) -> i32 {
    i32::try_from(size).unwrap_or(i32::MAX)
}

fn size_of(size: Option<i64>) -> u64 {
    size.and_then(|s| u64::try_from(s).ok()).unwrap_or(0)
}

/// Convert a ListObjects response into a page
pub(crate) fn object_page(output: &ListObjectsOutput) -> Page<ObjectCursor> {
    let entries = output
        .contents()
        .iter()
        .filter_map(|obj| Some(EntryRecord::object(obj.key()?, size_of(obj.size()))))
        .collect();

    Page {
        entries,
        truncated: output.is_truncated().unwrap_or(false),
        next: ObjectCursor::new(output.next_marker().map(str::to_string)),
    }
}

/// Seconds and nanoseconds, comparable without the SDK's own ordering
fn modified_at(time: Option<&DateTime>) -> Option<(i64, u32)> {
    time.map(|t| (t.secs(), t.subsec_nanos()))
}

/// Convert a ListObjectVersions response into a page.
///
/// Versions and delete markers come back as two lists. They are merged back
/// into server order: by key, then newest first within a key. The sort is
/// stable so entries without a timestamp keep their listed order.
pub(crate) fn version_page(output: &ListObjectVersionsOutput) -> Page<VersionCursor> {
    let versions = output.versions().iter().filter_map(|v| {
        let entry = EntryRecord::version(
            v.key()?,
            size_of(v.size()),
            v.version_id().map(str::to_string),
            v.is_latest().unwrap_or(false),
        );
        Some((entry, modified_at(v.last_modified())))
    });

    let markers = output.delete_markers().iter().filter_map(|dm| {
        let entry = EntryRecord::delete_marker(
            dm.key()?,
            dm.version_id().map(str::to_string),
            dm.is_latest().unwrap_or(false),
        );
        Some((entry, modified_at(dm.last_modified())))
    });

    let mut merged: Vec<(EntryRecord, Option<(i64, u32)>)> = versions.chain(markers).collect();
    merged.sort_by(|(a, a_time), (b, b_time)| {
        a.key.cmp(&b.key).then_with(|| b_time.cmp(a_time))
    });
    let entries = merged.into_iter().map(|(entry, _)| entry).collect();

    Page {
        entries,
        truncated: output.is_truncated().unwrap_or(false),
        next: VersionCursor::new(
            output.next_key_marker().map(str::to_string),
            output.next_version_id_marker().map(str::to_string),
        ),
    }
}
