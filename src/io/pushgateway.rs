use std::time::Duration;

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::core::params::RunParams;
use crate::types::{MetricBatch, MetricName};

/// Errors encountered when encoding or pushing a metric batch
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Prometheus encoding error: {0}")]
    Encode(#[from] prometheus::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status} {reason}: {body}")]
    Rejected {
        status: u16,
        reason: String,
        body: String,
    },
    #[error("Metric {metric} has labels {found:?}, expected {expected:?}")]
    LabelMismatch {
        metric: MetricName,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Render a batch in the Prometheus text exposition format. Every metric
/// family is typed `gauge`; the payload ends with a newline.
pub fn encode_batch(batch: &MetricBatch) -> Result<String, PushError> {
    let registry = Registry::new();
    let mut families: Vec<(MetricName, Vec<String>, GaugeVec)> = Vec::new();

    for record in batch.iter() {
        let keys = record.label_keys();
        let position = families.iter().position(|(name, _, _)| *name == record.name);
        let gauge = match position {
            Some(idx) => {
                let (_, expected, gauge) = &families[idx];
                if *expected != keys {
                    return Err(PushError::LabelMismatch {
                        metric: record.name,
                        expected: expected.clone(),
                        found: keys.iter().map(|k| k.to_string()).collect(),
                    });
                }
                gauge.clone()
            }
            None => {
                let gauge = GaugeVec::new(
                    Opts::new(record.name.as_str(), record.name.help()),
                    &keys,
                )?;
                registry.register(Box::new(gauge.clone()))?;
                families.push((
                    record.name,
                    keys.iter().map(|k| k.to_string()).collect(),
                    gauge.clone(),
                ));
                gauge
            }
        };
        gauge
            .with_label_values(record.label_values().as_slice())
            .set(record.value);
    }

    let payload = TextEncoder::new().encode_to_string(&registry.gather())?;
    debug!(
        "Encoded {} records into {} bytes across {} metric families",
        batch.len(),
        payload.len(),
        families.len()
    );
    Ok(payload)
}

/// Client for a Prometheus Pushgateway job URL
#[derive(Debug, Clone)]
pub struct PushgatewayClient {
    url: String,
    client: Client,
}

impl PushgatewayClient {
    /// `url` is the full push URL, e.g. `http://prometheus:9091/metrics/job/lighthouse`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PushError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn from_params(params: &RunParams) -> Result<Self, PushError> {
        Self::new(
            params.push_url(),
            Duration::from_secs(params.timeout_secs),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST the whole batch in one request.
    pub fn push(&self, batch: &MetricBatch) -> Result<(), PushError> {
        let payload = encode_batch(batch)?;
        info!("Pushing {} records to {}", batch.len(), self.url);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, TextEncoder::new().format_type())
            .body(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("").to_string();
            let body = response.text().unwrap_or_default();
            error!(
                "Error pushing results to {}: HTTP {} {}",
                self.url,
                status.as_u16(),
                reason
            );
            error!("{}", body);
            return Err(PushError::Rejected {
                status: status.as_u16(),
                reason,
                body,
            });
        }
        Ok(())
    }
}
