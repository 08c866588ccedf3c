use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid Pushgateway URL: {url}. Must start with http:// or https://")]
    InvalidPushgateway { url: String },

    #[error("Timeout must be greater than 0, got: {secs}")]
    ZeroTimeout { secs: u64 },

    #[error("Empty entry in --only-categories: {list}")]
    EmptyCategory { list: String },

    #[error("Empty URL argument at position {position}")]
    EmptyUrl { position: usize },
}
