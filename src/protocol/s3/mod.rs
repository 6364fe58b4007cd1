//! S3 listing backend
//!
//! Talks to AWS S3 and S3-compatible object stores through `aws-sdk-s3`, with
//! path-style addressing and, by default, legacy SigV2 request signing.
//! Only two operations are used: ListObjects (v1, marker based) and
//! ListObjectVersions.
//!
//! # Example
//!
//! ```ignore
//! use bucket_sizer::protocol::s3::{S3Client, S3Config};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = S3Config::new("bucket1", "http://10.1.83.51:9020", "user1", "secret");
//!     let client = S3Client::new(config).await?;
//!
//!     let page = client.list_objects_page("bucket1", 1000, None).await?;
//!     println!("{} entries, truncated: {}", page.entries.len(), page.truncated);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod pages;
pub mod signer;

pub use client::S3Client;
pub use config::{S3Config, SignatureVersion};
pub use error::{S3Error, S3Result};
pub use pages::{ObjectPages, VersionPages};

/// Region used when none is configured; SigV2 ignores it
pub const DEFAULT_REGION: &str = "us-east-1";

/// Attempts per request, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default page size for both listing APIs
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
