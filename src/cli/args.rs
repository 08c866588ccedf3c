use clap::Parser;
use std::path::PathBuf;

use lighthouse_push::core::params::{
    DEFAULT_LIGHTHOUSE_BIN, DEFAULT_PUSHGATEWAY, DEFAULT_TIMEOUT_SECS,
};

#[derive(Parser)]
#[command(
    name = "lighthouse-push",
    version,
    about = "Run lighthouse on one or more sites and push the results to Prometheus"
)]
pub struct CliArgs {
    /// URLs to audit, in order
    #[arg(value_name = "URL", required = true, num_args = 1..)]
    pub urls: Vec<String>,

    /// Optional flags to pass to Chrome: e.g. --chrome-flags="--proxy-server=socks5://localhost:1080"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    pub chrome_flags: String,

    /// Pushgateway base URL; a full push URL containing /metrics/job/ is used as-is
    #[arg(long, env = "PUSHGATEWAY_URL", default_value = DEFAULT_PUSHGATEWAY)]
    pub pushgateway: String,

    /// Lighthouse executable
    #[arg(long, env = "LIGHTHOUSE_BIN", default_value = DEFAULT_LIGHTHOUSE_BIN)]
    pub lighthouse_bin: PathBuf,

    /// Only audit these categories (comma-separated, e.g. performance,seo)
    #[arg(long, value_delimiter = ',')]
    pub only_categories: Vec<String>,

    /// Skip targets whose audit fails instead of aborting the whole run
    #[arg(long, default_value_t = false)]
    pub keep_going: bool,

    /// Timeout for the push request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
