#![doc = r##"
lighthouse-push — run Google Lighthouse against a list of URLs and push the
scores to a Prometheus Pushgateway.

Each target is audited by the external `lighthouse` CLI, one after another.
Every report is flattened into gauge samples and the whole run is pushed to
`<gateway>/metrics/job/lighthouse` in a single request, so a failed audit
never leaves a partial batch behind.

Metrics
-------
| Name            | Labels                      |
|-----------------|-----------------------------|
| `total_time`    | `instance`                  |
| `total_score`   | `instance` (legacy reports) |
| `section_score` | `instance`, `section`       |
| `audit_score`   | `instance`, `section`, `id` |

`instance` is the target URL with a trailing slash.

Quick start
-----------
```rust,no_run
use lighthouse_push::{RunParams, Target, run_with_params};

fn main() -> lighthouse_push::Result<()> {
    let params = RunParams {
        pushgateway: "http://localhost:9091".to_string(),
        chrome_flags: Some("--headless".to_string()),
        ..RunParams::default()
    };
    let targets = vec![Target::from("https://www.loc.gov"), Target::from("https://www.wdl.org")];

    let report = run_with_params(&targets, &params)?;
    println!("audited={} pushed={}", report.audited, report.pushed);
    Ok(())
}
```

Custom collaborators
--------------------
`run_and_push` is generic over the [`Auditor`] and [`MetricsPusher`] traits,
so reports can come from somewhere other than a local `lighthouse` binary and
batches can go somewhere other than a Pushgateway.

```rust
use lighthouse_push::{
    AuditReport, Auditor, LighthouseError, MetricBatch, MetricsPusher, PushError, Target,
    run_and_push,
};

struct Canned;

impl Auditor for Canned {
    fn audit(&self, _target: &Target) -> Result<AuditReport, LighthouseError> {
        let json = r#"{"url":"https://example.org/","score":90,"timing":{"total":1200},
                       "reportCategories":[{"name":"Performance","score":90,"audits":[]}]}"#;
        Ok(AuditReport::from_json(json)?)
    }
}

struct Discard;

impl MetricsPusher for Discard {
    fn url(&self) -> &str {
        "discard://"
    }
    fn push(&self, _batch: &MetricBatch) -> Result<(), PushError> {
        Ok(())
    }
}

let mut out = Vec::new();
let report = run_and_push(&[Target::from("https://example.org")], &Canned, &Discard, false, &mut out)
    .unwrap();
assert_eq!(report.pushed, 3);
```

Error handling
--------------
All public entrypoints return `lighthouse_push::Result<T>`; match on
`lighthouse_push::Error` to tell audit failures from push failures.

Useful modules
--------------
- [`api`] — high-level entry points and collaborator traits.
- [`types`] — `Target`, `MetricRecord`, `MetricBatch`.
- [`io`] — Lighthouse runner, report decoding and Pushgateway client.
- [`error`] — crate-level `Error` and `Result`.
"##]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::RunParams;
pub use error::{Error, Result};
pub use types::{Label, MetricBatch, MetricName, MetricRecord, Target};

// Collaborators
pub use io::lighthouse::{LighthouseError, LighthouseRunner};
pub use io::pushgateway::{PushError, PushgatewayClient, encode_batch};
pub use io::report::{AuditReport, ReportError};

// High-level API re-exports
pub use api::{
    Auditor, MetricsPusher, RunReport, collect_metrics, run_and_push, run_with_params,
};
