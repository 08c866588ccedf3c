use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Errors encountered when decoding a Lighthouse JSON report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unrecognized Lighthouse report: expected `reportCategories` or `categories`")]
    UnknownSchema,
    #[error("Missing field `{0}` in Lighthouse report")]
    MissingField(&'static str),
}

/// Which Lighthouse JSON layout a report was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSchema {
    /// Lighthouse 2.x: `reportCategories` array, top-level `score`
    Legacy,
    /// Lighthouse 3 and later: `categories` and `audits` objects
    Current,
}

/// Score of one audit within a category
#[derive(Debug, Clone, PartialEq)]
pub struct AuditScore {
    pub id: String,
    pub score: Option<f64>,
}

/// One report category (Lighthouse "section")
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub score: Option<f64>,
    pub audits: Vec<AuditScore>,
}

/// Parsed result of one Lighthouse run
#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    pub schema: ReportSchema,
    /// URL as reported by Lighthouse (requested URL where available)
    pub url: String,
    pub final_url: Option<String>,
    pub fetch_time: Option<DateTime<Utc>>,
    /// Total run duration in milliseconds
    pub total_time_ms: f64,
    /// Overall score; only legacy reports carry one
    pub score: Option<f64>,
    pub categories: Vec<Category>,
}

fn usable(value: Option<f64>) -> bool {
    value.is_some_and(f64::is_finite)
}

impl AuditReport {
    /// Decode a report, detecting the schema from its top-level keys.
    pub fn from_json(text: &str) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ReportError> {
        let report = if value.get("reportCategories").is_some() {
            let raw: LegacyReport = serde_json::from_value(value)?;
            raw.into_report()
        } else if value.get("categories").is_some() {
            let raw: CurrentReport = serde_json::from_value(value)?;
            raw.into_report()?
        } else {
            return Err(ReportError::UnknownSchema);
        };
        debug!(
            "Decoded {:?} report for {} ({} categories)",
            report.schema,
            report.url,
            report.categories.len()
        );
        Ok(report)
    }

    /// Number of metric records this report flattens into.
    pub fn metric_count(&self) -> usize {
        let mut count =
            usize::from(self.total_time_ms.is_finite()) + usize::from(usable(self.score));
        for category in &self.categories {
            count += usize::from(usable(category.score));
            count += category.audits.iter().filter(|a| usable(a.score)).count();
        }
        count
    }
}

/// Timestamps are informational only; an unparsable one decodes as `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let parsed = match raw {
        Some(Value::String(text)) => match text.parse::<DateTime<Utc>>() {
            Ok(time) => Some(time),
            Err(e) => {
                debug!("Ignoring unparsable report timestamp {:?}: {}", text, e);
                None
            }
        },
        Some(Value::Null) | None => None,
        Some(other) => {
            debug!("Ignoring non-string report timestamp {}", other);
            None
        }
    };
    Ok(parsed)
}

#[derive(Deserialize)]
struct Timing {
    total: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyReport {
    url: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    generated_time: Option<DateTime<Utc>>,
    score: Option<f64>,
    timing: Timing,
    report_categories: Vec<LegacyCategory>,
}

#[derive(Deserialize)]
struct LegacyCategory {
    name: String,
    score: Option<f64>,
    #[serde(default)]
    audits: Vec<LegacyAudit>,
}

#[derive(Deserialize)]
struct LegacyAudit {
    id: String,
    score: Option<f64>,
}

impl LegacyReport {
    fn into_report(self) -> AuditReport {
        AuditReport {
            schema: ReportSchema::Legacy,
            url: self.url,
            final_url: None,
            fetch_time: self.generated_time,
            total_time_ms: self.timing.total,
            score: self.score,
            categories: self
                .report_categories
                .into_iter()
                .map(|c| Category {
                    name: c.name,
                    score: c.score,
                    audits: c
                        .audits
                        .into_iter()
                        .map(|a| AuditScore {
                            id: a.id,
                            score: a.score,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentReport {
    requested_url: Option<String>,
    final_url: Option<String>,
    final_displayed_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    fetch_time: Option<DateTime<Utc>>,
    timing: Timing,
    // Object order is the report's category order (serde_json `preserve_order`)
    categories: Map<String, Value>,
    #[serde(default)]
    audits: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CurrentCategory {
    title: Option<String>,
    score: Option<f64>,
    #[serde(default)]
    audit_refs: Vec<AuditRef>,
}

#[derive(Deserialize)]
struct AuditRef {
    id: String,
}

#[derive(Deserialize)]
struct CurrentAudit {
    score: Option<f64>,
}

impl CurrentReport {
    fn into_report(self) -> Result<AuditReport, ReportError> {
        let final_url = self.final_url.or(self.final_displayed_url);
        let url = self
            .requested_url
            .or_else(|| final_url.clone())
            .ok_or(ReportError::MissingField("requestedUrl"))?;

        let mut categories = Vec::with_capacity(self.categories.len());
        for (id, raw) in self.categories {
            let category: CurrentCategory = serde_json::from_value(raw)?;
            let mut audits = Vec::with_capacity(category.audit_refs.len());
            for audit_ref in category.audit_refs {
                let score = match self.audits.get(&audit_ref.id) {
                    Some(raw) => serde_json::from_value::<CurrentAudit>(raw.clone())?.score,
                    None => None,
                };
                audits.push(AuditScore {
                    id: audit_ref.id,
                    score,
                });
            }
            categories.push(Category {
                name: category.title.unwrap_or(id),
                score: category.score,
                audits,
            });
        }

        Ok(AuditReport {
            schema: ReportSchema::Current,
            url,
            final_url,
            fetch_time: self.fetch_time,
            total_time_ms: self.timing.total,
            score: None,
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_legacy_report() {
        let text = json!({
            "url": "https://www.loc.gov/",
            "generatedTime": "2017-11-20T15:04:05.123Z",
            "score": 71.2,
            "timing": { "total": 5181.5 },
            "reportCategories": [
                {
                    "name": "Performance",
                    "score": 64.0,
                    "audits": [
                        { "id": "first-meaningful-paint", "score": 80 },
                        { "id": "screenshot-thumbnails", "score": null }
                    ]
                },
                { "name": "Accessibility", "score": 90.5, "audits": [] }
            ]
        })
        .to_string();

        let report = AuditReport::from_json(&text).unwrap();
        assert_eq!(report.schema, ReportSchema::Legacy);
        assert_eq!(report.url, "https://www.loc.gov/");
        assert_eq!(report.score, Some(71.2));
        assert_eq!(report.total_time_ms, 5181.5);
        assert!(report.fetch_time.is_some());
        assert_eq!(report.categories.len(), 2);
        assert_eq!(report.categories[0].audits[1].score, None);
        // total_time + total_score + 2 sections + 1 scored audit
        assert_eq!(report.metric_count(), 5);
    }

    #[test]
    fn decodes_current_report_in_category_order() {
        let text = json!({
            "requestedUrl": "https://www.wdl.org",
            "finalUrl": "https://www.wdl.org/en/",
            "fetchTime": "2024-03-01T10:00:00.000Z",
            "timing": { "total": 12000.0 },
            "categories": {
                "performance": {
                    "title": "Performance",
                    "score": 0.42,
                    "auditRefs": [ { "id": "speed-index" }, { "id": "diagnostics" } ]
                },
                "accessibility": {
                    "title": "Accessibility",
                    "score": 0.97,
                    "auditRefs": [ { "id": "color-contrast" }, { "id": "not-in-audits" } ]
                }
            },
            "audits": {
                "speed-index": { "score": 0.3 },
                "diagnostics": { "score": null },
                "color-contrast": { "score": 1 }
            }
        })
        .to_string();

        let report = AuditReport::from_json(&text).unwrap();
        assert_eq!(report.schema, ReportSchema::Current);
        assert_eq!(report.url, "https://www.wdl.org");
        assert_eq!(report.final_url.as_deref(), Some("https://www.wdl.org/en/"));
        assert_eq!(report.score, None);
        let names: Vec<&str> = report.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Performance", "Accessibility"]);
        assert_eq!(report.categories[0].audits[0].score, Some(0.3));
        assert_eq!(report.categories[1].audits[1].score, None);
        // total_time + 2 sections + speed-index + color-contrast
        assert_eq!(report.metric_count(), 5);
    }

    #[test]
    fn current_report_falls_back_to_category_id() {
        let text = json!({
            "finalDisplayedUrl": "https://example.org/",
            "timing": { "total": 1.0 },
            "categories": { "seo": { "score": 1.0, "auditRefs": [] } }
        })
        .to_string();
        let report = AuditReport::from_json(&text).unwrap();
        assert_eq!(report.url, "https://example.org/");
        assert_eq!(report.categories[0].name, "seo");
    }

    #[test]
    fn unparsable_timestamps_do_not_fail_the_report() {
        let legacy = json!({
            "url": "https://www.loc.gov/",
            "generatedTime": "Mon Nov 20 2017 15:04:05 GMT+0000",
            "score": 71.2,
            "timing": { "total": 5181.5 },
            "reportCategories": []
        })
        .to_string();
        let report = AuditReport::from_json(&legacy).unwrap();
        assert_eq!(report.fetch_time, None);
        assert_eq!(report.metric_count(), 2);

        let current = json!({
            "requestedUrl": "https://www.wdl.org",
            "fetchTime": 1709287200000u64,
            "timing": { "total": 1.0 },
            "categories": {}
        })
        .to_string();
        assert_eq!(AuditReport::from_json(&current).unwrap().fetch_time, None);

        let missing = json!({
            "requestedUrl": "https://www.wdl.org",
            "timing": { "total": 1.0 },
            "categories": {}
        })
        .to_string();
        assert_eq!(AuditReport::from_json(&missing).unwrap().fetch_time, None);
    }

    #[test]
    fn rejects_unknown_schema() {
        let err = AuditReport::from_json(r#"{"lighthouseVersion": "9.0.0"}"#).unwrap_err();
        assert!(matches!(err, ReportError::UnknownSchema));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = AuditReport::from_json("Runtime error encountered").unwrap_err();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[test]
    fn current_report_requires_a_url() {
        let text = json!({ "timing": { "total": 1.0 }, "categories": {} }).to_string();
        let err = AuditReport::from_json(&text).unwrap_err();
        assert!(matches!(err, ReportError::MissingField("requestedUrl")));
    }
}
