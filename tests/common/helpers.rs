//! Shared helpers for the integration tests.
//!
//! The download flows run against a loopback HTTP listener that serves
//! canned responses one connection at a time; folder resolution runs against
//! recorded fixture pages through the `ManifestSource` seam. No test touches
//! the network.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use async_trait::async_trait;
use drivedl::folder::{ManifestSource, FOLDER_MIME_TYPE};
use drivedl::{Error, Result};

/// Installs a tracing subscriber once so failing runs can be replayed with
/// `RUST_LOG=drivedl=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A parsed incoming request: the request target plus lowercased headers.
pub struct Request {
    pub target: String,
    pub headers: HashMap<String, String>,
}

impl Request {
    /// The resume offset from a `Range: bytes=N-` header, if present.
    pub fn range_offset(&self) -> Option<u64> {
        self.headers
            .get("range")
            .and_then(|value| value.strip_prefix("bytes="))
            .and_then(|value| value.strip_suffix('-'))
            .and_then(|value| value.parse().ok())
    }
}

/// A canned response.
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
    pub extra_headers: Vec<(String, String)>,
}

impl Response {
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.to_string(),
            body: body.into(),
            extra_headers: Vec::new(),
        }
    }

    pub fn bytes(body: impl Into<Vec<u8>>) -> Self {
        Self::ok("application/octet-stream", body)
    }

    pub fn html(body: &str) -> Self {
        Self::ok("text/html; charset=utf-8", body.as_bytes().to_vec())
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.extra_headers
            .push((name.to_string(), value.to_string()));
        self
    }
}

/// A loopback HTTP listener serving one connection at a time.
pub struct TestServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    /// Spawns the listener; `handler` is called once per request.
    pub fn spawn<F>(handler: F) -> Self
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        let hits = Arc::new(AtomicUsize::new(0));
        let hit_counter = Arc::clone(&hits);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };
                hit_counter.fetch_add(1, Ordering::SeqCst);
                if let Some(request) = read_request(&mut stream) {
                    let response = handler(&request);
                    let _ = write_response(&mut stream, &response);
                }
            }
        });

        Self { addr, hits }
    }

    pub fn url(&self, target: &str) -> String {
        format!("http://{}{}", self.addr, target)
    }

    /// Number of requests served so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let target = request_line.split_whitespace().nth(1)?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }
    Some(Request { target, headers })
}

fn write_response(stream: &mut TcpStream, response: &Response) -> std::io::Result<()> {
    let reason = match response.status {
        200 => "OK",
        206 => "Partial Content",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        reason,
        response.content_type,
        response.body.len()
    );
    for (name, value) in &response.extra_headers {
        head.push_str(name);
        head.push_str(": ");
        head.push_str(value);
        head.push_str("\r\n");
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes())?;
    stream.write_all(&response.body)?;
    stream.flush()
}

/// Builds a folder page the way the provider lays one out: the manifest JSON
/// is the second single-quoted literal of the script block carrying the
/// marker token, with double quotes encoded as `\x22` hex escapes.
pub fn folder_page(title: &str, rows: &[(&str, &str, &str)]) -> String {
    let manifest = serde_json::json!([rows
        .iter()
        .map(|(id, name, mime)| serde_json::json!([id, serde_json::Value::Null, name, mime]))
        .collect::<Vec<_>>()]);
    let embedded = manifest.to_string().replace('"', r"\x22");
    format!(
        "<html><head><title>{}</title></head><body>\
         <script>window.init();</script>\
         <script>window._DRIVE_ivd = load('session-token', '{}');</script>\
         </body></html>",
        title, embedded
    )
}

/// The canonical URL for a folder id, as the resolver fetches it.
pub fn folder_url(id: &str) -> String {
    format!("https://drive.google.com/drive/folders/{}", id)
}

/// A manifest row marking a subfolder.
pub fn folder_row<'a>(id: &'a str, name: &'a str) -> (&'a str, &'a str, &'a str) {
    (id, name, FOLDER_MIME_TYPE)
}

/// Serves recorded folder pages keyed by URL.
pub struct FixtureSource {
    pages: HashMap<String, String>,
}

impl FixtureSource {
    pub fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ManifestSource for FixtureSource {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::FolderParse(format!("no fixture for {}", url)))
    }
}

/// Deterministic test payload of the given size.
pub fn test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}
