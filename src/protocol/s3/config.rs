//! Configuration types for S3 client

use super::error::{S3Error, S3Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Request signing scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureVersion {
    /// Legacy HMAC-SHA1 signing, for backends without SigV4 support
    #[default]
    V2,

    /// Standard SigV4 signing performed by the SDK
    V4,
}

impl fmt::Display for SignatureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureVersion::V2 => write!(f, "v2"),
            SignatureVersion::V4 => write!(f, "v4"),
        }
    }
}

/// S3 client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,

    /// Endpoint URL, including scheme. Port optional.
    pub endpoint: String,

    /// Access key ID
    pub access_key: String,

    /// Secret access key
    pub secret_key: String,

    /// Region used for endpoint resolution (SigV2 itself is region-less)
    pub region: String,

    /// Socket read timeout in milliseconds
    pub socket_timeout_ms: Option<u64>,

    /// Maximum attempts per request, including the first
    pub max_attempts: u32,

    /// Path-style addressing
    pub force_path_style: bool,

    /// Signing scheme
    pub signature: SignatureVersion,
}

impl S3Config {
    /// Create a new S3 config with required parameters
    pub fn new(
        bucket: impl Into<String>,
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: super::DEFAULT_REGION.to_string(),
            socket_timeout_ms: None,
            max_attempts: super::DEFAULT_MAX_ATTEMPTS,
            force_path_style: true,
            signature: SignatureVersion::V2,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> S3Result<()> {
        if self.bucket.is_empty() {
            return Err(S3Error::InvalidBucketName(
                "Bucket name cannot be empty".to_string(),
            ));
        }

        let endpoint = url::Url::parse(&self.endpoint).map_err(|e| {
            S3Error::InvalidConfig(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(S3Error::InvalidConfig(format!(
                "Endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }
        if endpoint.host_str().is_none() {
            return Err(S3Error::InvalidConfig(format!(
                "Endpoint has no host: {}",
                self.endpoint
            )));
        }

        if self.access_key.is_empty() || self.secret_key.is_empty() {
            return Err(S3Error::InvalidConfig(
                "Both access_key and secret_key must be provided".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(S3Error::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }

        if self.socket_timeout_ms == Some(0) {
            return Err(S3Error::InvalidConfig(
                "socket timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket read timeout as a duration
    pub fn read_timeout(&self) -> Option<Duration> {
        self.socket_timeout_ms.map(Duration::from_millis)
    }
}

// Keep the secret out of logs
impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("socket_timeout_ms", &self.socket_timeout_ms)
            .field("max_attempts", &self.max_attempts)
            .field("force_path_style", &self.force_path_style)
            .field("signature", &self.signature)
            .finish()
    }
}
