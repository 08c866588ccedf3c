//! High-level library API: audit a list of targets and push every resulting
//! metric to a Pushgateway in one batch. Prefer these entrypoints over the
//! low-level `io` and `core` modules when embedding lighthouse-push.
use std::io::Write;

use tracing::{info, warn};

use crate::core::flatten::extract_metrics_from_report;
use crate::core::params::RunParams;
use crate::error::{Error, Result};
use crate::io::lighthouse::{LighthouseError, LighthouseRunner};
use crate::io::pushgateway::{PushError, PushgatewayClient};
use crate::io::report::AuditReport;
use crate::types::{MetricBatch, Target};

/// Produces one audit report per target
pub trait Auditor {
    fn audit(&self, target: &Target) -> std::result::Result<AuditReport, LighthouseError>;
}

impl Auditor for LighthouseRunner {
    fn audit(&self, target: &Target) -> std::result::Result<AuditReport, LighthouseError> {
        self.run(target)
    }
}

/// Accepts a whole metric batch in one call
pub trait MetricsPusher {
    /// Destination shown in the summary line
    fn url(&self) -> &str;
    fn push(&self, batch: &MetricBatch) -> std::result::Result<(), PushError>;
}

impl MetricsPusher for PushgatewayClient {
    fn url(&self) -> &str {
        PushgatewayClient::url(self)
    }

    fn push(&self, batch: &MetricBatch) -> std::result::Result<(), PushError> {
        PushgatewayClient::push(self, batch)
    }
}

/// Outcome of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub audited: usize,
    pub skipped: usize,
    pub pushed: usize,
}

/// Audit every target in order and collect the flattened records.
/// If `keep_going` is true, failed targets are logged and skipped; otherwise
/// the first failure is returned.
pub fn collect_metrics<A, W>(
    targets: &[Target],
    auditor: &A,
    keep_going: bool,
    out: &mut W,
) -> Result<(MetricBatch, RunReport)>
where
    A: Auditor + ?Sized,
    W: Write,
{
    let mut batch = MetricBatch::new();
    let mut report = RunReport::default();

    for target in targets {
        writeln!(out, "Launching lighthouse for {}…", target)?;
        out.flush()?;

        match auditor.audit(target) {
            Ok(audit) => {
                let records = extract_metrics_from_report(&audit, target);
                info!(
                    "Collected {} metrics for {} (fetched {}, final URL {})",
                    records.len(),
                    target,
                    audit
                        .fetch_time
                        .map_or_else(|| "at unknown time".to_string(), |t| t.to_rfc3339()),
                    audit.final_url.as_deref().unwrap_or(&audit.url)
                );
                batch.extend(records);
                report.audited += 1;
            }
            Err(e) if keep_going => {
                warn!("Skipping {}: {}", target, e);
                report.skipped += 1;
            }
            Err(e) => {
                return Err(Error::AuditFailure {
                    target: target.to_string(),
                    source: e,
                });
            }
        }
    }

    Ok((batch, report))
}

/// Audit all targets, then push the whole batch once and print a summary line.
/// Nothing is pushed unless every audit succeeded (or, with `keep_going`,
/// at least one produced metrics).
pub fn run_and_push<A, P, W>(
    targets: &[Target],
    auditor: &A,
    pusher: &P,
    keep_going: bool,
    out: &mut W,
) -> Result<RunReport>
where
    A: Auditor + ?Sized,
    P: MetricsPusher + ?Sized,
    W: Write,
{
    if targets.is_empty() {
        return Err(Error::InvalidArgument {
            arg: "URL",
            value: String::new(),
        });
    }

    let (batch, mut report) = collect_metrics(targets, auditor, keep_going, out)?;

    let Some(first) = batch.first() else {
        return Err(Error::NoResults);
    };

    pusher.push(&batch).map_err(|source| Error::PushFailure {
        url: pusher.url().to_string(),
        source,
    })?;
    report.pushed = batch.len();

    writeln!(
        out,
        "Pushed {} results to {}: {}…",
        batch.len(),
        pusher.url(),
        first
    )?;
    if report.skipped > 0 {
        warn!(
            "{} of {} targets failed and were not pushed",
            report.skipped,
            targets.len()
        );
    }

    Ok(report)
}

/// Run the real `lighthouse` CLI and Pushgateway client configured by `params`,
/// printing progress to stdout.
pub fn run_with_params(targets: &[Target], params: &RunParams) -> Result<RunReport> {
    let auditor = LighthouseRunner::from_params(params);
    info!(
        "Auditing {} targets with {}",
        targets.len(),
        auditor.bin().display()
    );
    let pusher = PushgatewayClient::from_params(params).map_err(|source| Error::PushFailure {
        url: params.push_url(),
        source,
    })?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_and_push(targets, &auditor, &pusher, params.keep_going, &mut out)
}
