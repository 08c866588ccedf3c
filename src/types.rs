//! Shared types used across lighthouse-push.
//! Includes the audit `Target`, metric `Label`s, `MetricName`, `MetricRecord`
//! and the per-run `MetricBatch`.
use serde::{Deserialize, Serialize};

use crate::core::flatten::normalize_instance;

/// A URL to audit.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(String);

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value of the `instance` label for records derived from this target.
    pub fn instance(&self) -> String {
        normalize_instance(&self.0)
    }
}

impl From<&str> for Target {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Target {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metric families produced from a Lighthouse report. Every family is a gauge.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    TotalTime,
    TotalScore,
    SectionScore,
    AuditScore,
}

impl MetricName {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricName::TotalTime => "total_time",
            MetricName::TotalScore => "total_score",
            MetricName::SectionScore => "section_score",
            MetricName::AuditScore => "audit_score",
        }
    }

    /// HELP text used in the exposition payload.
    pub fn help(self) -> &'static str {
        match self {
            MetricName::TotalTime => "Total Lighthouse run time in milliseconds",
            MetricName::TotalScore => "Overall Lighthouse report score",
            MetricName::SectionScore => "Lighthouse category score",
            MetricName::AuditScore => "Lighthouse audit score",
        }
    }
}

impl std::fmt::Display for MetricName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One Prometheus-style label pair.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single (name, labels, value) sample derived from one audit report.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: MetricName,
    /// Ordered: `instance`, then `section`, then `id`.
    pub labels: Vec<Label>,
    pub value: f64,
}

impl MetricRecord {
    pub fn new(name: MetricName, labels: Vec<Label>, value: f64) -> Self {
        Self {
            name,
            labels,
            value,
        }
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.value.as_str())
    }

    pub fn label_keys(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.key.as_str()).collect()
    }

    pub fn label_values(&self) -> Vec<&str> {
        self.labels.iter().map(|l| l.value.as_str()).collect()
    }
}

impl std::fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels = self
            .labels
            .iter()
            .map(|l| format!("{}=\"{}\"", l.key, l.value))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "({}, {{{}}}, {})", self.name, labels, self.value)
    }
}

/// All records collected during one run, pushed as a unit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetricBatch {
    records: Vec<MetricRecord>,
}

impl MetricBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = MetricRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&MetricRecord> {
        self.records.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetricRecord> {
        self.records.iter()
    }
}

impl From<Vec<MetricRecord>> for MetricBatch {
    fn from(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }
}
