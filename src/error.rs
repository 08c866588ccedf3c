//! Crate-level error type and `Result` alias for structured error handling.
//! Wraps audit and push failures with the target or gateway they concern,
//! and provides semantic variants for argument validation.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lighthouse audit failed for {target}: {source}")]
    AuditFailure {
        target: String,
        #[source]
        source: crate::io::LighthouseError,
    },

    #[error("Error pushing results to {url}: {source}")]
    PushFailure {
        url: String,
        #[source]
        source: crate::io::PushError,
    },

    #[error("No metrics collected; nothing was pushed")]
    NoResults,

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },
}

impl Error {
    /// Target URL for audit failures.
    pub fn target(&self) -> Option<&str> {
        match self {
            Error::AuditFailure { target, .. } => Some(target.as_str()),
            _ => None,
        }
    }
}
