#![allow(dead_code)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use serde_json::{Value, json};

/// Shell snippet that stores the `--output-path=` argument in `$out`.
pub const FIND_OUTPUT: &str = r#"out=""
for arg in "$@"; do
  case "$arg" in
    --output-path=*) out="${arg#--output-path=}" ;;
  esac
done"#;

/// Lighthouse 2.x style report with fully scored sections.
pub fn legacy_report(url: &str, sections: &[(&str, usize)]) -> String {
    let categories: Vec<Value> = sections
        .iter()
        .map(|(name, audits)| {
            let audits: Vec<Value> = (0..*audits)
                .map(|i| json!({ "id": format!("{name}-audit-{i}"), "score": (i % 100) as f64 }))
                .collect();
            json!({ "name": name, "score": 75.0, "audits": audits })
        })
        .collect();
    json!({
        "url": url,
        "generatedTime": "2017-11-20T15:04:05.123Z",
        "score": 71.5,
        "timing": { "total": 5181.5 },
        "reportCategories": categories
    })
    .to_string()
}

/// Records produced by `legacy_report` for the same `sections`.
pub fn legacy_metric_count(sections: &[(&str, usize)]) -> usize {
    2 + sections.iter().map(|(_, audits)| 1 + audits).sum::<usize>()
}

/// 2 + (1 + 47) = 50 records
pub const LOC_SECTIONS: &[(&str, usize)] = &[("Performance", 47)];
/// 2 + (1 + 29) + (1 + 29) = 62 records
pub const WDL_SECTIONS: &[(&str, usize)] = &[("Performance", 29), ("Accessibility", 29)];

#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<String>,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|h| {
            let (k, v) = h.split_once(':')?;
            k.eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }
}

/// Minimal HTTP/1.1 server standing in for a Pushgateway. Every request is
/// answered with `status` and forwarded to the returned receiver.
pub fn spawn_gateway(
    status: u16,
    reason: &'static str,
    response_body: &'static str,
) -> (String, mpsc::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock gateway");
    let addr = listener.local_addr().expect("mock gateway address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 {
                    break;
                }
                let line = line.trim_end().to_string();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    if k.eq_ignore_ascii_case("content-length") {
                        content_length = v.trim().parse().unwrap_or(0);
                    }
                }
                headers.push(line);
            }
            let mut body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut body);

            let _ = tx.send(CapturedRequest {
                request_line: request_line.trim_end().to_string(),
                headers,
                body: String::from_utf8_lossy(&body).into_owned(),
            });

            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
                response_body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (format!("http://{addr}"), rx)
}

/// Write an executable `/bin/sh` script into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("script metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod script");
    path
}
