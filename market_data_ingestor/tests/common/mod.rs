//! A tiny HTTP/1.1 stub standing in for the OHLC endpoint.

use std::sync::{Arc, Mutex};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    /// Request lines (`GET /path?query HTTP/1.1`) in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server on an ephemeral port. `route` maps the request target
/// (path plus query) to a status code and a JSON body.
pub async fn start<F>(route: F) -> StubServer
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    let route = Arc::new(route);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let seen = Arc::clone(&seen);
            let route = Arc::clone(&route);

            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let head = String::from_utf8_lossy(&buf);
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let target = request_line.split(' ').nth(1).unwrap_or("/").to_string();
                seen.lock().unwrap().push(request_line);

                let (status, body) = route(&target);
                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    StubServer {
        base_url: format!("http://{addr}/api/v3"),
        requests,
    }
}

/// `n` daily tuples starting at 2023-11-14T22:13:20Z.
pub fn ohlc_body(n: usize) -> String {
    let rows: Vec<String> = (0..n)
        .map(|i| {
            let ts = 1_700_000_000_000i64 + i as i64 * 86_400_000;
            let close = 100.0 + i as f64;
            format!("[{ts},{close},{},{},{close}]", close + 1.0, close - 1.0)
        })
        .collect();
    format!("[{}]", rows.join(","))
}
