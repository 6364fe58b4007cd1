/*!
 * Configuration for bucket-sizer
 *
 * Settings come from an optional TOML file and are then overridden by
 * command line flags. Only the merged result is validated.
 */

use crate::error::{Result, SizerError};
use crate::listing::{ListingMode, ObjectCursor, VersionCursor};
use crate::protocol::s3::{self, S3Config, SignatureVersion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Merged run configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SizerConfig {
    /// S3 endpoint URL, including scheme
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub access_key: Option<String>,

    #[serde(default)]
    pub secret_key: Option<String>,

    #[serde(default)]
    pub bucket: Option<String>,

    /// Entries requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Socket read timeout in milliseconds
    #[serde(default)]
    pub socket_timeout_ms: Option<u64>,

    /// List objects instead of object versions
    #[serde(default)]
    pub no_versions: bool,

    /// Key marker to start listing from
    #[serde(default)]
    pub key_marker: Option<String>,

    /// Version id marker to start listing from (version mode only)
    #[serde(default)]
    pub version_marker: Option<String>,

    /// Write listed key names to this file
    #[serde(default)]
    pub key_file: Option<PathBuf>,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub signature: SignatureVersion,

    /// HTTP attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Print the final report as JSON
    #[serde(default)]
    pub json: bool,

    /// Show a spinner while listing
    #[serde(default = "default_true")]
    pub show_progress: bool,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Shorthand for debug logging
    #[serde(default)]
    pub verbose: bool,

    /// Write JSON logs to this file instead of stderr
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_page_size() -> u32 {
    s3::DEFAULT_PAGE_SIZE
}

fn default_region() -> String {
    s3::DEFAULT_REGION.to_string()
}

fn default_max_attempts() -> u32 {
    s3::DEFAULT_MAX_ATTEMPTS
}

fn default_true() -> bool {
    true
}

impl Default for SizerConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: None,
            secret_key: None,
            bucket: None,
            page_size: default_page_size(),
            socket_timeout_ms: None,
            no_versions: false,
            key_marker: None,
            version_marker: None,
            key_file: None,
            region: default_region(),
            signature: SignatureVersion::default(),
            max_attempts: default_max_attempts(),
            json: false,
            show_progress: true,
            log_level: LogLevel::default(),
            verbose: false,
            log_file: None,
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl SizerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SizerError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config: SizerConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn mode(&self) -> ListingMode {
        if self.no_versions {
            ListingMode::Objects
        } else {
            ListingMode::Versions
        }
    }

    /// Check the merged configuration before anything touches the network
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("--endpoint", &self.endpoint),
            ("--access-key", &self.access_key),
            ("--secret-key", &self.secret_key),
            ("--bucket", &self.bucket),
        ] {
            if value.as_deref().map_or(true, str::is_empty) {
                return Err(SizerError::Argument(format!("{} is required", name)));
            }
        }

        if self.page_size == 0 {
            return Err(SizerError::Argument(
                "--page-size must be at least 1".to_string(),
            ));
        }

        if self.socket_timeout_ms == Some(0) {
            return Err(SizerError::Argument(
                "--socket-timeout must be positive".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(SizerError::Argument(
                "--max-attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Backend settings; call after [`validate`](Self::validate)
    pub fn s3_config(&self) -> Result<S3Config> {
        let required = |value: &Option<String>, name: &str| {
            value
                .clone()
                .ok_or_else(|| SizerError::Argument(format!("{} is required", name)))
        };

        let mut config = S3Config::new(
            required(&self.bucket, "--bucket")?,
            required(&self.endpoint, "--endpoint")?,
            required(&self.access_key, "--access-key")?,
            required(&self.secret_key, "--secret-key")?,
        );
        config.region = self.region.clone();
        config.socket_timeout_ms = self.socket_timeout_ms;
        config.max_attempts = self.max_attempts;
        config.signature = self.signature;

        config
            .validate()
            .map_err(|e| SizerError::Argument(e.to_string()))?;
        Ok(config)
    }

    pub fn object_cursor(&self) -> ObjectCursor {
        if self.version_marker.is_some() {
            tracing::warn!("--version-marker is ignored when listing objects");
        }
        ObjectCursor::new(self.key_marker.clone())
    }

    pub fn version_cursor(&self) -> VersionCursor {
        VersionCursor::new(self.key_marker.clone(), self.version_marker.clone())
    }
}

impl fmt::Debug for SizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizerConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("bucket", &self.bucket)
            .field("page_size", &self.page_size)
            .field("socket_timeout_ms", &self.socket_timeout_ms)
            .field("mode", &self.mode())
            .field("key_marker", &self.key_marker)
            .field("version_marker", &self.version_marker)
            .field("key_file", &self.key_file)
            .field("region", &self.region)
            .field("signature", &self.signature)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn complete() -> SizerConfig {
        SizerConfig {
            endpoint: Some("http://10.1.83.51:9020".to_string()),
            access_key: Some("user1".to_string()),
            secret_key: Some("secret1".to_string()),
            bucket: Some("bucket1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = SizerConfig::default();
        assert_eq!(config.page_size, 1000);
        assert_eq!(config.mode(), ListingMode::Versions);
        assert_eq!(config.signature, SignatureVersion::V2);
        assert_eq!(config.max_attempts, 3);
        assert!(config.show_progress);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_missing_required_values() {
        let err = SizerConfig::default().validate().unwrap_err();
        assert!(matches!(err, SizerError::Argument(ref m) if m.contains("--endpoint")));

        let mut config = complete();
        config.bucket = Some(String::new());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SizerError::Argument(ref m) if m.contains("--bucket")));
    }

    #[test]
    fn test_page_size_must_be_positive() {
        let mut config = complete();
        config.page_size = 0;
        assert_eq!(config.validate().unwrap_err().exit_code(), 255);
    }

    #[test]
    fn test_s3_config_carries_settings() {
        let mut config = complete();
        config.socket_timeout_ms = Some(30_000);
        config.signature = SignatureVersion::V4;
        config.max_attempts = 5;

        let s3 = config.s3_config().unwrap();
        assert_eq!(s3.bucket, "bucket1");
        assert_eq!(s3.endpoint, "http://10.1.83.51:9020");
        assert_eq!(s3.socket_timeout_ms, Some(30_000));
        assert_eq!(s3.signature, SignatureVersion::V4);
        assert_eq!(s3.max_attempts, 5);
        assert!(s3.force_path_style);
    }

    #[test]
    fn test_bad_endpoint_is_argument_error() {
        let mut config = complete();
        config.endpoint = Some("10.1.83.51:9020".to_string());
        assert!(matches!(
            config.s3_config(),
            Err(SizerError::Argument(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
endpoint = "http://localhost:9000"
access_key = "minio"
secret_key = "minio123"
bucket = "logs"
page_size = 250
no_versions = true
key_marker = "2020/"
signature = "v4"
log_level = "debug"
"#
        )
        .unwrap();

        let config = SizerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bucket.as_deref(), Some("logs"));
        assert_eq!(config.page_size, 250);
        assert_eq!(config.mode(), ListingMode::Objects);
        assert_eq!(config.object_cursor().marker.as_deref(), Some("2020/"));
        assert_eq!(config.signature, SignatureVersion::V4);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.region, "us-east-1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "endpont = \"typo\"").unwrap();

        let err = SizerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SizerError::Config(_)));
    }

    #[test]
    fn test_from_missing_file() {
        let err = SizerConfig::from_file(Path::new("/nonexistent/sizer.toml")).unwrap_err();
        assert!(matches!(err, SizerError::Config(_)));
    }

    #[test]
    fn test_version_cursor_seed() {
        let mut config = complete();
        config.key_marker = Some("k".to_string());
        config.version_marker = Some("v".to_string());
        assert_eq!(
            config.version_cursor(),
            VersionCursor::new(Some("k".to_string()), Some("v".to_string()))
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", complete());
        assert!(!rendered.contains("secret1"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
