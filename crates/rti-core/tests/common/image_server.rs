//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of routes and answers HEAD and GET with
//! Content-Type and Content-Length headers. Every request is recorded so
//! tests can assert how many network calls a code path made (or that it made
//! none). A route can declare a length different from its body to simulate a
//! server that closes mid-transfer.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct Route {
    content_type: String,
    body: Vec<u8>,
    declared_length: Option<u64>,
}

impl Route {
    pub fn new(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.to_string(),
            body: body.into(),
            declared_length: None,
        }
    }

    /// Lie about the body length (GET will still send only the real body).
    pub fn with_declared_length(mut self, length: u64) -> Self {
        self.declared_length = Some(length);
        self
    }
}

pub struct ImageServer {
    base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

/// Starts a server in a background thread. Route keys are absolute paths
/// including any query string (e.g. "/abc123.jpg", "/r/aww/top.json?t=week&limit=2").
/// The server runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let table: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let hits: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let hits_acceptor = Arc::clone(&hits);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let table = Arc::clone(&table);
            let hits = Arc::clone(&hits_acceptor);
            thread::spawn(move || handle(stream, &table, &hits));
        }
    });
    ImageServer {
        base_url: format!("http://127.0.0.1:{port}"),
        hits,
    }
}

impl ImageServer {
    /// Full URL for a path given without its leading slash.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requests seen for one path, any method.
    pub fn request_count(&self, path: &str) -> usize {
        self.hits
            .lock()
            .unwrap()
            .iter()
            .filter(|hit| hit.ends_with(path))
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.hits.lock().unwrap().len()
    }
}

fn handle(mut stream: std::net::TcpStream, table: &HashMap<String, Route>, hits: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let Some((method, path)) = parse_request_line(request) else {
        return;
    };
    hits.lock().unwrap().push(format!("{method} {path}"));

    let Some(route) = table.get(path) else {
        let _ = stream.write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
        return;
    };

    let declared = route
        .declared_length
        .unwrap_or(route.body.len() as u64);
    let header = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
        route.content_type, declared
    );
    let _ = stream.write_all(header.as_bytes());
    if method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(&route.body);
    }
}

/// Returns (method, path-with-query) from the request line.
fn parse_request_line(request: &str) -> Option<(&str, &str)> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let path = parts.next()?;
    Some((method, path))
}
