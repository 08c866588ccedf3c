use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, error};

use crate::core::params::RunParams;
use crate::io::report::{AuditReport, ReportError};
use crate::types::Target;

/// Errors encountered when running the Lighthouse CLI
#[derive(Debug, Error)]
pub enum LighthouseError {
    #[error("failed to start {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("child process returned {}: {stderr}", describe_exit(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Lighthouse wrote an empty report")]
    EmptyReport,
    #[error("unparsable report: {0}")]
    Report(#[from] ReportError),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "no exit code (killed by signal)".to_string(),
    }
}

/// Runs the external `lighthouse` CLI once per target and decodes its report
#[derive(Debug, Clone)]
pub struct LighthouseRunner {
    bin: PathBuf,
    chrome_flags: Option<String>,
    only_categories: Vec<String>,
}

impl LighthouseRunner {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            chrome_flags: None,
            only_categories: Vec::new(),
        }
    }

    pub fn from_params(params: &RunParams) -> Self {
        Self {
            bin: params.lighthouse_bin.clone(),
            chrome_flags: params.chrome_flags.clone(),
            only_categories: params.only_categories.clone(),
        }
    }

    pub fn with_chrome_flags(mut self, flags: impl Into<String>) -> Self {
        self.chrome_flags = Some(flags.into());
        self
    }

    pub fn with_only_categories(mut self, categories: Vec<String>) -> Self {
        self.only_categories = categories;
        self
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Arguments passed to the audit tool for one URL.
    pub fn command_args(&self, url: &str, output_path: &Path) -> Vec<OsString> {
        let mut output_arg = OsString::from("--output-path=");
        output_arg.push(output_path);

        let mut args: Vec<OsString> = vec![
            url.into(),
            "--output=json".into(),
            output_arg,
            "--quiet".into(),
        ];
        if let Some(flags) = self.chrome_flags.as_deref().filter(|f| !f.is_empty()) {
            args.push(format!("--chrome-flags={}", flags).into());
        }
        if !self.only_categories.is_empty() {
            args.push(format!("--only-categories={}", self.only_categories.join(",")).into());
        }
        args
    }

    /// Audit one target. Blocks until the child process exits.
    pub fn run(&self, target: &Target) -> Result<AuditReport, LighthouseError> {
        let report_file = tempfile::Builder::new()
            .prefix("lighthouse-")
            .suffix(".json")
            .tempfile()?;

        let args = self.command_args(target.as_str(), report_file.path());
        debug!("Running {} {:?}", self.bin.display(), args);

        let output = Command::new(&self.bin)
            .args(&args)
            .output()
            .map_err(|e| LighthouseError::Spawn {
                bin: self.bin.display().to_string(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("{}", stderr);
            return Err(LighthouseError::NonZeroExit {
                code: output.status.code(),
                stderr,
            });
        }

        let text = std::fs::read_to_string(report_file.path())?;
        if text.trim().is_empty() {
            return Err(LighthouseError::EmptyReport);
        }
        debug!("Read {} bytes of report JSON for {}", text.len(), target);

        Ok(AuditReport::from_json(&text)?)
    }
}

impl Default for LighthouseRunner {
    fn default() -> Self {
        Self::from_params(&RunParams::default())
    }
}
