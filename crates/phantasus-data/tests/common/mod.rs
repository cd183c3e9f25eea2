//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use tiny_http::{Response, Server};

/// Upper bound for any awaited load in tests. Network-backed tests can be
/// slow, so this is read from `PHANTASUS_TEST_TIMEOUT_SECS` (default 100).
pub fn test_timeout() -> Duration {
    let secs = std::env::var("PHANTASUS_TEST_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);
    Duration::from_secs(secs)
}

pub async fn within<F: Future>(fut: F) -> F::Output {
    tokio::time::timeout(test_timeout(), fut)
        .await
        .expect("test timed out")
}

/// A small series matrix with `samples` columns and the given rows.
pub fn series_matrix_text(series: &str, samples: &[&str], rows: &[(&str, &[&str])]) -> String {
    let quoted = |items: &[&str]| {
        items
            .iter()
            .map(|s| format!("\"{s}\""))
            .collect::<Vec<_>>()
            .join("\t")
    };
    let titles: Vec<String> = (0..samples.len()).map(|i| format!("sample {i}")).collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    let strains: Vec<&str> = samples.iter().map(|_| "strain: C57BL/6").collect();

    let mut text = String::new();
    text.push_str(&format!("!Series_title\t\"Test series {series}\"\n"));
    text.push_str(&format!("!Series_geo_accession\t\"{series}\"\n"));
    text.push_str("!Series_platform_id\t\"GPL1261\"\n");
    text.push_str(&format!("!Sample_title\t{}\n", quoted(&titles)));
    text.push_str(&format!("!Sample_geo_accession\t{}\n", quoted(samples)));
    text.push_str(&format!("!Sample_characteristics_ch1\t{}\n", quoted(&strains)));
    text.push_str("!series_matrix_table_begin\n");
    text.push_str(&format!("\"ID_REF\"\t{}\n", quoted(samples)));
    for (id, values) in rows {
        text.push_str(&format!("\"{id}\"\t{}\n", values.join("\t")));
    }
    text.push_str("!series_matrix_table_end\n");
    text
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(bytes).unwrap();
    enc.finish().unwrap()
}

pub fn listing_html(files: &[&str]) -> String {
    let links: String = files
        .iter()
        .map(|f| format!("<a href=\"{f}\">{f}</a>\n"))
        .collect();
    format!("<html><body>\n<a href=\"../\">Parent Directory</a>\n{links}</body></html>")
}

/// Serves fixed responses by request path on an ephemeral local port.
pub struct FixtureServer {
    pub base_url: String,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureServer {
    pub fn start(routes: HashMap<String, (u16, Vec<u8>)>) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let srv = Arc::clone(&server);
        let handle = std::thread::spawn(move || {
            for request in srv.incoming_requests() {
                let (status, body) = routes
                    .get(request.url())
                    .cloned()
                    .unwrap_or((404, b"not found".to_vec()));
                let _ = request.respond(Response::from_data(body).with_status_code(status));
            }
        });
        FixtureServer {
            base_url: format!("http://127.0.0.1:{port}/geo"),
            server,
            handle: Some(handle),
        }
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
