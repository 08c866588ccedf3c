use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PUSHGATEWAY: &str = "http://prometheus:9091";
pub const DEFAULT_LIGHTHOUSE_BIN: &str = "lighthouse";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Job name every batch is pushed under.
pub const JOB_NAME: &str = "lighthouse";

/// Run parameters suitable for config files and programmatic use
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunParams {
    /// Audit tool executable
    pub lighthouse_bin: PathBuf,
    /// Opaque flags forwarded as `--chrome-flags=<value>`
    pub chrome_flags: Option<String>,
    /// Restrict the audit to these categories; empty means all
    pub only_categories: Vec<String>,
    /// Pushgateway base URL, or a full push URL containing `/metrics/job/`
    pub pushgateway: String,
    /// Skip failed targets instead of aborting the run
    pub keep_going: bool,
    /// Push request timeout in seconds
    pub timeout_secs: u64,
}

impl RunParams {
    /// Full URL the batch is POSTed to.
    pub fn push_url(&self) -> String {
        push_url(&self.pushgateway, JOB_NAME)
    }
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            lighthouse_bin: PathBuf::from(DEFAULT_LIGHTHOUSE_BIN),
            chrome_flags: None,
            only_categories: Vec::new(),
            pushgateway: DEFAULT_PUSHGATEWAY.to_string(),
            keep_going: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Append `/metrics/job/<job>` to a gateway base URL. URLs that already name a
/// job are returned unchanged.
pub fn push_url(base: &str, job: &str) -> String {
    if base.contains("/metrics/job/") {
        return base.to_string();
    }
    format!("{}/metrics/job/{}", base.trim_end_matches('/'), job)
}
