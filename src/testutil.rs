//! Minimal in-process HTTP server standing in for the NWIS service in tests.
//! Serves a scripted sequence of responses (the last one repeats) and records
//! each request line so tests can assert on the outgoing query string.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub(crate) struct MockService {
    url: String,
    hits: Arc<AtomicUsize>,
    request_lines: Arc<Mutex<Vec<String>>>,
    accept_loop: JoinHandle<()>,
}

impl MockService {
    pub(crate) async fn start(responses: Vec<(u16, String)>) -> Self {
        assert!(!responses.is_empty(), "mock service needs at least one response");
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("binding a loopback listener should succeed");
        let addr = listener.local_addr().expect("listener has a local address");

        let hits = Arc::new(AtomicUsize::new(0));
        let request_lines = Arc::new(Mutex::new(Vec::new()));

        let hits_task = Arc::clone(&hits);
        let lines_task = Arc::clone(&request_lines);
        let accept_loop = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let hit = hits_task.fetch_add(1, Ordering::SeqCst);

                let mut buf = vec![0u8; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();
                if let Some(line) = request.lines().next() {
                    lines_task.lock().unwrap().push(line.to_string());
                }

                let (status, body) = &responses[hit.min(responses.len() - 1)];
                let reason = if *status < 400 { "OK" } else { "ERROR" };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        Self {
            url: format!("http://{addr}/nwis/dv/"),
            hits,
            request_lines,
            accept_loop,
        }
    }

    pub(crate) fn url(&self) -> String {
        self.url.clone()
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub(crate) fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

impl Drop for MockService {
    fn drop(&mut self) {
        // The accept loop would otherwise park in accept() for the rest of
        // the process.
        self.accept_loop.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn dropping_the_service_stops_the_accept_loop() {
        let server = MockService::start(vec![(200, String::new())]).await;
        let addr = server
            .url()
            .strip_prefix("http://")
            .and_then(|rest| rest.split('/').next())
            .expect("url carries host:port")
            .to_string();

        TcpStream::connect(&addr)
            .await
            .expect("listener should accept while the service is alive");

        drop(server);
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(
            TcpStream::connect(&addr).await.is_err(),
            "listener should be closed once the service is dropped"
        );
    }
}
