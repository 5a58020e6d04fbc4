//! Minimal HTTP server for exercising the network paths.
//!
//! Serves canned responses by exact request path and records every path it was
//! asked for, so tests can assert that a download did, or did not, happen.
//! Each connection handles one `GET` and is closed afterwards.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// A canned response.
#[derive(Debug, Clone)]
pub struct StubResponse {
    /// Status code
    pub status: u16,
    /// Body bytes
    pub body: Vec<u8>,
    /// `Content-Type` header value
    pub content_type: &'static str,
}

impl StubResponse {
    /// `200 OK` with a JSON body.
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.as_bytes().to_vec(),
            content_type: "application/json",
        }
    }

    /// `200 OK` with a checkpoint document reporting `version`.
    pub fn checkpoint(product: &str, version: &str) -> Self {
        Self::json(&format!(
            r#"{{"product":"{product}","current_version":"{version}","current_release":1700000000,"alerts":[]}}"#
        ))
    }

    /// `200 OK` with a binary body.
    pub fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            body,
            content_type: "application/zip",
        }
    }

    /// An empty response with `status`.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            content_type: "text/plain",
        }
    }
}

type Routes = Arc<Mutex<HashMap<String, StubResponse>>>;

/// In-process HTTP server on `127.0.0.1` with an ephemeral port.
pub struct ReleaseServer {
    addr: SocketAddr,
    routes: Routes,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl ReleaseServer {
    /// Bind and start serving. Unknown paths answer `404`.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let routes: Routes = Arc::default();
        let requests: Arc<Mutex<Vec<String>>> = Arc::default();

        let handle = {
            let routes = Arc::clone(&routes);
            let requests = Arc::clone(&requests);
            tokio::spawn(async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let routes = Arc::clone(&routes);
                    let requests = Arc::clone(&requests);
                    tokio::spawn(async move {
                        let _ = handle_connection(stream, routes, requests).await;
                    });
                }
            })
        };

        Ok(Self {
            addr,
            routes,
            requests,
            handle,
        })
    }

    /// Serve `response` for requests to `path`.
    pub fn route(&self, path: impl Into<String>, response: StubResponse) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(path.into(), response);
        }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Checkpoint URL template served by this server.
    pub fn checkpoint_template(&self) -> String {
        self.url("/v1/check/{product}")
    }

    /// Release URL template served by this server.
    pub fn releases_template(&self) -> String {
        self.url("/{product}/{version}/{product}_{version}_{os}_{arch}.zip")
    }

    /// Request paths received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Drop for ReleaseServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    routes: Routes,
    requests: Arc<Mutex<Vec<String>>>,
) -> std::io::Result<()> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf);
    let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
    if let Ok(mut log) = requests.lock() {
        log.push(path.clone());
    }

    let response = routes
        .lock()
        .ok()
        .and_then(|r| r.get(&path).cloned())
        .unwrap_or_else(|| StubResponse::status(404));

    let header = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status,
        response.content_type,
        response.body.len()
    );
    stream.write_all(header.as_bytes()).await?;
    stream.write_all(&response.body).await?;
    stream.flush().await?;
    stream.shutdown().await
}
