//! Shared fixtures for unit tests: a canned response and a one-shot HTTP server.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const PARIS_JSON: &str = r#"{"name":"Paris","sys":{"country":"FR"},"main":{"temp":20.6,"feels_like":19.9,"temp_min":18.0,"temp_max":22.0,"humidity":60,"pressure":1012},"weather":[{"main":"Clear","description":"clear sky","icon":"01d"}],"wind":{"speed":3.5},"visibility":10000}"#;

/// Serves a single response on a local port.
///
/// Returns the endpoint URL and a handle resolving to the raw request head.
pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    serve_raw(status, body, body.len()).await
}

/// Like [`serve_once`], but advertises `content_length` bytes and closes after sending `body`.
pub async fn serve_truncated(
    status: &'static str,
    body: &'static str,
    content_length: usize,
) -> (String, JoinHandle<String>) {
    serve_raw(status, body, content_length).await
}

async fn serve_raw(
    status: &'static str,
    body: &'static str,
    content_length: usize,
) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {content_length}\r\nConnection: close\r\n\r\n{body}"
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;

        String::from_utf8_lossy(&head).into_owned()
    });

    (format!("http://{addr}/data/2.5/weather"), handle)
}

/// An endpoint on a port nothing listens on.
pub async fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    format!("http://{addr}/data/2.5/weather")
}
