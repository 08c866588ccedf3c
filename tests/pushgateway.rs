mod common;

use std::net::TcpListener;
use std::time::Duration;

use lighthouse_push::core::flatten::extract_metrics_from_report;
use lighthouse_push::{AuditReport, MetricBatch, PushError, PushgatewayClient, Target};

use common::{LOC_SECTIONS, legacy_report, spawn_gateway};

fn loc_batch() -> MetricBatch {
    let report = AuditReport::from_json(&legacy_report("https://www.loc.gov/", LOC_SECTIONS)).unwrap();
    MetricBatch::from(extract_metrics_from_report(
        &report,
        &Target::from("https://www.loc.gov"),
    ))
}

#[test]
fn test_push_posts_exposition_to_job_url() {
    let (base, requests) = spawn_gateway(200, "OK", "");
    let url = format!("{base}/metrics/job/lighthouse");
    let client = PushgatewayClient::new(&url, Duration::from_secs(5)).unwrap();

    client.push(&loc_batch()).unwrap();

    let request = requests.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(request.request_line, "POST /metrics/job/lighthouse HTTP/1.1");
    assert!(request.header("content-type").unwrap().starts_with("text/plain"));
    assert!(request.body.contains("# TYPE total_time gauge"));
    assert!(request.body.contains("# TYPE audit_score gauge"));
    assert!(request.body.contains("total_time{instance=\"https://www.loc.gov/\"} 5181.5"));
    assert!(request.body.ends_with('\n'));
    assert!(requests.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn test_rejected_push_reports_status_and_body() {
    let (base, _requests) = spawn_gateway(400, "Bad Request", "text format parsing error in line 3");
    let client =
        PushgatewayClient::new(format!("{base}/metrics/job/lighthouse"), Duration::from_secs(5))
            .unwrap();

    let err = client.push(&loc_batch()).unwrap_err();

    match err {
        PushError::Rejected {
            status,
            reason,
            body,
        } => {
            assert_eq!(status, 400);
            assert_eq!(reason, "Bad Request");
            assert_eq!(body, "text format parsing error in line 3");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unreachable_gateway_is_an_http_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = PushgatewayClient::new(
        format!("http://127.0.0.1:{port}/metrics/job/lighthouse"),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = client.push(&loc_batch()).unwrap_err();

    assert!(matches!(err, PushError::Http(_)));
}
