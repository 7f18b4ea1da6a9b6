//! Runs the `crypto-ingest` binary against a local OHLC endpoint.
//! Needs a disposable Postgres database:
//! `TEST_DATABASE_URL=postgres://... cargo test -p price_store -- --ignored`

use std::{
    io::{Read, Write},
    net::TcpListener,
    process::{Command, Output},
    thread,
};

use price_store::repo::{PgPriceRepo, PriceRepo};
use serial_test::serial;

mod common;

/// Serves `/coins/bitcoin/ohlc` with three bars and 404s everything else.
fn start_ohlc_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    thread::spawn(move || {
        for mut socket in listener.incoming().flatten() {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }

            let head = String::from_utf8_lossy(&buf);
            let target = head.split(' ').nth(1).unwrap_or("/");
            let (status, body) = if target.starts_with("/api/v3/coins/bitcoin/ohlc?") {
                (
                    "200 OK",
                    "[[1700000000000,100,101,99,100],\
                      [1700086400000,101,102,100,101],\
                      [1700172800000,102,103,101,102]]"
                        .to_string(),
                )
            } else {
                ("404 Not Found", r#"{"error":"coin not found"}"#.to_string())
            };
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes());
        }
    });

    format!("http://{addr}/api/v3")
}

fn run_ingest(config: &std::path::Path, database_url: &str, base_url: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_crypto-ingest"))
        .arg("--config")
        .arg(config)
        .env("DATABASE_URL", database_url)
        .env("COINGECKO_BASE_URL", base_url)
        .env("NO_PROXY", "127.0.0.1")
        .env("no_proxy", "127.0.0.1")
        .env_remove("COINGECKO_API_KEY")
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
#[ignore = "needs TEST_DATABASE_URL"]
#[serial]
fn partial_failure_prints_summary_and_exits_non_zero() {
    let (_cfg, mut conn) = common::setup_db(&["CLI_OK", "CLI_MISSING"]);
    let database_url = std::env::var("TEST_DATABASE_URL").unwrap();
    let base_url = start_ohlc_stub();

    let mut config = tempfile::NamedTempFile::new().unwrap();
    write!(
        config,
        r#"
days = 30

[[assets]]
coin_id = "bitcoin"
symbol = "CLI_OK"

[[assets]]
coin_id = "nonexistent"
symbol = "CLI_MISSING"
"#
    )
    .unwrap();

    let output = run_ingest(config.path(), &database_url, &base_url);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success(), "stderr: {stderr}");
    assert!(stderr.contains("ERROR: CLI_MISSING"), "stderr: {stderr}");
    assert!(
        stderr.contains("SUMMARY: 1 succeeded, 1 failed, 3 rows inserted"),
        "stderr: {stderr}"
    );

    let repo = PgPriceRepo::new();
    assert_eq!(repo.count_rows(&mut conn, "CLI_OK").unwrap(), 3);
    assert_eq!(repo.count_rows(&mut conn, "CLI_MISSING").unwrap(), 0);

    // A rerun inserts nothing new and still fails on the missing coin.
    let rerun = run_ingest(config.path(), &database_url, &base_url);
    let stderr = String::from_utf8_lossy(&rerun.stderr);
    assert!(!rerun.status.success(), "stderr: {stderr}");
    assert!(
        stderr.contains("SUMMARY: 1 succeeded, 1 failed, 0 rows inserted"),
        "stderr: {stderr}"
    );
    assert_eq!(repo.count_rows(&mut conn, "CLI_OK").unwrap(), 3);
}
