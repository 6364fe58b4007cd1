//! Error types for S3 listing operations

use thiserror::Error;

/// Result type alias for S3 operations
pub type S3Result<T> = Result<T, S3Error>;

/// Errors that can occur while talking to the storage backend
#[derive(Error, Debug, Clone)]
pub enum S3Error {
    /// AWS SDK error that did not fit any other category
    #[error("AWS SDK error: {0}")]
    Sdk(String),

    /// S3 service error with specific error code
    #[error("S3 service error ({code}): {message}")]
    Service { code: String, message: String },

    /// Bucket not found or not accessible
    #[error("Bucket not found or not accessible: {0}")]
    BucketNotFound(String),

    /// Access denied error
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid bucket name
    #[error("Invalid bucket name: {0}")]
    InvalidBucketName(String),

    /// Request signing failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<S3Error>,
    },
}

impl S3Error {
    /// Add context to an error
    pub fn context<S: Into<String>>(self, context: S) -> Self {
        S3Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Convert AWS SDK errors to S3Error
impl<E> From<aws_sdk_s3::error::SdkError<E>> for S3Error
where
    E: aws_sdk_s3::error::ProvideErrorMetadata + std::error::Error + 'static,
{
    fn from(error: aws_sdk_s3::error::SdkError<E>) -> Self {
        use aws_sdk_s3::error::SdkError;

        match error {
            SdkError::TimeoutError(e) => S3Error::Timeout(format!("{:?}", e)),
            SdkError::DispatchFailure(e) => {
                if e.is_timeout() {
                    S3Error::Timeout(format!("{:?}", e))
                } else {
                    S3Error::Network(format!("Network dispatch failure: {:?}", e))
                }
            }
            SdkError::ResponseError(e) => S3Error::Network(format!("Response error: {:?}", e)),
            SdkError::ServiceError(e) => {
                let err = e.err();
                let code = err.code().unwrap_or("Unknown").to_string();
                let message = err.message().unwrap_or_default().to_string();
                classify_service_error(code, message)
            }
            other => S3Error::Sdk(format!("{:?}", other)),
        }
    }
}

/// Map a service error code onto the matching variant
pub(crate) fn classify_service_error(code: String, message: String) -> S3Error {
    match code.as_str() {
        "NoSuchBucket" => S3Error::BucketNotFound(message),
        "AccessDenied" | "SignatureDoesNotMatch" | "InvalidAccessKeyId" => {
            S3Error::AccessDenied(format!("{}: {}", code, message))
        }
        _ => S3Error::Service { code, message },
    }
}
