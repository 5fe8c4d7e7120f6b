/// Canned-response HTTP server for exercising the remote adapter
///
/// Each route maps "METHOD /path" (query string ignored) to a fixed status
/// and JSON body. Connections are closed after one response, so the client
/// reconnects per request; unknown routes answer 404.
use std::collections::HashMap;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct StubServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("local addr");
        let routes: HashMap<String, (u16, String)> = routes
            .into_iter()
            .map(|(key, status, body)| (key.to_string(), (status, body.to_string())))
            .collect();

        let handle = tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = routes.clone();
                tokio::spawn(async move {
                    let _ = serve_one(socket, &routes).await;
                });
            }
        });

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_one(
    mut socket: TcpStream,
    routes: &HashMap<String, (u16, String)>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    // Read up to the end of the request headers.
    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();

    // Drain the body so the client finishes writing before we respond.
    let content_length = head
        .lines()
        .find_map(|line| {
            line.to_ascii_lowercase()
                .strip_prefix("content-length:")
                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut parts = head.split_whitespace();
    let method = parts.next().unwrap_or("");
    let target = parts.next().unwrap_or("");
    let path = target.split('?').next().unwrap_or("");
    let key = format!("{} {}", method, path);

    let (status, body) = routes
        .get(&key)
        .cloned()
        .unwrap_or((404, "{\"error\":\"no route\"}".to_string()));
    let reason = if status < 400 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}
