/*!
 * Error types for bucket-sizer
 */

use crate::protocol::s3::S3Error;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SizerError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_SINK_OPEN: i32 = 1;
pub const EXIT_SINK_WRITE: i32 = 2;
pub const EXIT_SINK_CLOSE: i32 = 3;
pub const EXIT_BACKEND: i32 = 4;
pub const EXIT_PROTOCOL: i32 = 5;
pub const EXIT_USAGE: i32 = 255;

#[derive(Debug, Error)]
pub enum SizerError {
    /// Bad or missing command line argument
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Configuration file could not be read or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// The storage backend rejected or failed a request
    #[error("Backend error: {0}")]
    Backend(#[from] S3Error),

    #[error("Cannot open key file {}: {source}", .path.display())]
    SinkOpen { path: PathBuf, source: io::Error },

    #[error("Cannot write to key file {}: {source}", .path.display())]
    SinkWrite { path: PathBuf, source: io::Error },

    #[error("Cannot close key file {}: {source}", .path.display())]
    SinkClose { path: PathBuf, source: io::Error },

    /// Server reply that the pagination loop cannot make progress from
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
}

impl SizerError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SizerError::Argument(_) | SizerError::Config(_) => EXIT_USAGE,
            SizerError::SinkOpen { .. } => EXIT_SINK_OPEN,
            SizerError::SinkWrite { .. } => EXIT_SINK_WRITE,
            SizerError::SinkClose { .. } => EXIT_SINK_CLOSE,
            SizerError::Backend(_) => EXIT_BACKEND,
            SizerError::ProtocolViolation(_) => EXIT_PROTOCOL,
        }
    }
}

impl From<toml::de::Error> for SizerError {
    fn from(err: toml::de::Error) -> Self {
        SizerError::Config(format!("TOML parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn test_exit_code_constants() {
        assert_eq!(EXIT_SUCCESS, 0);
        assert_eq!(EXIT_SINK_OPEN, 1);
        assert_eq!(EXIT_SINK_WRITE, 2);
        assert_eq!(EXIT_SINK_CLOSE, 3);
        assert_eq!(EXIT_USAGE, 255);
    }

    #[test]
    fn test_exit_codes() {
        let path = PathBuf::from("/tmp/keys.txt");
        assert_eq!(
            SizerError::SinkOpen {
                path: path.clone(),
                source: io_err()
            }
            .exit_code(),
            EXIT_SINK_OPEN
        );
        assert_eq!(
            SizerError::SinkWrite {
                path: path.clone(),
                source: io_err()
            }
            .exit_code(),
            EXIT_SINK_WRITE
        );
        assert_eq!(
            SizerError::SinkClose {
                path,
                source: io_err()
            }
            .exit_code(),
            EXIT_SINK_CLOSE
        );
        assert_eq!(
            SizerError::Argument("--page-size".to_string()).exit_code(),
            EXIT_USAGE
        );
        assert_eq!(
            SizerError::Config("missing endpoint".to_string()).exit_code(),
            EXIT_USAGE
        );
        assert_eq!(
            SizerError::from(S3Error::Network("reset".to_string())).exit_code(),
            EXIT_BACKEND
        );
        assert_eq!(
            SizerError::ProtocolViolation("stuck".to_string()).exit_code(),
            EXIT_PROTOCOL
        );
    }

    #[test]
    fn test_error_display() {
        let err = SizerError::SinkWrite {
            path: PathBuf::from("keys.txt"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(err.to_string(), "Cannot write to key file keys.txt: disk full");

        let err = SizerError::from(S3Error::AccessDenied("nope".to_string()));
        assert_eq!(err.to_string(), "Backend error: Access denied: nope");
    }

    #[test]
    fn test_sink_errors_keep_source() {
        use std::error::Error;
        let err = SizerError::SinkOpen {
            path: PathBuf::from("x"),
            source: io_err(),
        };
        assert!(err.source().is_some());
    }
}
