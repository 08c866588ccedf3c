//! Flatten a decoded Lighthouse report into Prometheus-style metric records.
use tracing::debug;

use crate::io::report::AuditReport;
use crate::types::{Label, MetricName, MetricRecord, Target};

/// Normalize a target URL for the `instance` label: append a trailing slash
/// when absent. Already slash-terminated URLs are returned unchanged.
pub fn normalize_instance(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

fn push_if_usable(
    out: &mut Vec<MetricRecord>,
    name: MetricName,
    labels: Vec<Label>,
    value: Option<f64>,
) {
    match value {
        Some(v) if v.is_finite() => out.push(MetricRecord::new(name, labels, v)),
        _ => debug!("Skipping {} without a usable value: {:?}", name, labels),
    }
}

/// Build the records for one report. Order: `total_time`, `total_score`, then
/// per category a `section_score` followed by its `audit_score`s.
pub fn extract_metrics_from_report(report: &AuditReport, target: &Target) -> Vec<MetricRecord> {
    let instance = Label::new("instance", target.instance());
    let mut results = Vec::with_capacity(report.metric_count());

    push_if_usable(
        &mut results,
        MetricName::TotalTime,
        vec![instance.clone()],
        Some(report.total_time_ms),
    );
    push_if_usable(
        &mut results,
        MetricName::TotalScore,
        vec![instance.clone()],
        report.score,
    );

    for section in &report.categories {
        let section_label = Label::new("section", section.name.as_str());

        push_if_usable(
            &mut results,
            MetricName::SectionScore,
            vec![instance.clone(), section_label.clone()],
            section.score,
        );

        for audit in &section.audits {
            push_if_usable(
                &mut results,
                MetricName::AuditScore,
                vec![
                    instance.clone(),
                    section_label.clone(),
                    Label::new("id", audit.id.as_str()),
                ],
                audit.score,
            );
        }
    }

    results
}
