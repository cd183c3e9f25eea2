//! End-to-end `phantasus load` against a local GEO mirror.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use std::thread::JoinHandle;

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;
use predicates::prelude::*;
use tempfile::tempdir;
use tiny_http::{Response, Server};

const MATRIX_DIR: &str = "/geo/GSE1nnn/GSE1234/matrix/";

const SERIES_MATRIX: &str = "\
!Series_title\t\"Export test\"
!Series_geo_accession\t\"GSE1234\"
!Series_platform_id\t\"GPL1261\"
!Sample_geo_accession\t\"GSM1\"\t\"GSM2\"
!series_matrix_table_begin
\"ID_REF\"\t\"GSM1\"\t\"GSM2\"
\"p1\"\t1.5\t2
\"p2\"\tnull\t4
!series_matrix_table_end
";

struct Mirror {
    base_url: String,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
}

impl Mirror {
    fn start() -> Self {
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(SERIES_MATRIX.as_bytes()).unwrap();
        let gz = enc.finish().unwrap();

        let mut routes: HashMap<String, Vec<u8>> = HashMap::new();
        routes.insert(
            MATRIX_DIR.to_string(),
            b"<a href=\"GSE1234_series_matrix.txt.gz\">GSE1234_series_matrix.txt.gz</a>".to_vec(),
        );
        routes.insert(format!("{MATRIX_DIR}GSE1234_series_matrix.txt.gz"), gz);

        let server = Arc::new(Server::http("127.0.0.1:0").unwrap());
        let port = server.server_addr().to_ip().unwrap().port();
        let srv = Arc::clone(&server);
        let handle = std::thread::spawn(move || {
            for request in srv.incoming_requests() {
                let response = match routes.get(request.url()) {
                    Some(body) => Response::from_data(body.clone()),
                    None => Response::from_data(b"not found".to_vec()).with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });
        Mirror {
            base_url: format!("http://127.0.0.1:{port}/geo"),
            server,
            handle: Some(handle),
        }
    }
}

impl Drop for Mirror {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

// ---------------------------------------------------------------------------
// load
// ---------------------------------------------------------------------------

#[test]
fn load_prints_summary() {
    let mirror = Mirror::start();
    Command::cargo_bin("phantasus")
        .unwrap()
        .args(["load", "GSE1234", "--base-url", &mirror.base_url])
        .assert()
        .success()
        .stdout("GSE1234\t2 rows\t2 columns\tGPL1261\n");
}

#[test]
fn load_exports_tsv_to_output_dir() {
    let mirror = Mirror::start();
    let out = tempdir().unwrap();
    let out_dir = out.path().join("exports");

    Command::cargo_bin("phantasus")
        .unwrap()
        .args(["load", "gse1234", "--base-url", &mirror.base_url, "-o"])
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("GSE1234\t2 rows\t2 columns"));

    let tsv = fs::read_to_string(out_dir.join("GSE1234.tsv")).unwrap();
    assert_eq!(tsv, "id\tGSM1\tGSM2\np1\t1.5\t2\np2\t\t4\n");
}

#[test]
fn load_reports_missing_series() {
    let mirror = Mirror::start();
    let out = tempdir().unwrap();

    Command::cargo_bin("phantasus")
        .unwrap()
        .args(["load", "GSE9999", "--base-url", &mirror.base_url, "-o"])
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("fetch failed"));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}
