//! I/O layer: running the Lighthouse CLI (`lighthouse`), decoding its JSON
//! reports (`report`), and pushing metric batches to a Pushgateway
//! (`pushgateway`).
pub mod lighthouse;
pub use lighthouse::{LighthouseError, LighthouseRunner};

pub mod report;
pub use report::{AuditReport, AuditScore, Category, ReportError, ReportSchema};

pub mod pushgateway;
pub use pushgateway::{PushError, PushgatewayClient, encode_batch};
