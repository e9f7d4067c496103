//! Shared fixtures for app integration tests.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use phish_guard_analysis_contract::AnalysisRequest;
use phish_guard_client::{AnalysisClient, AnalysisError, AnalysisTransport, TransportResponse};
use url::Url;

/// Transport replaying scripted responses in order; the last one repeats.
#[allow(dead_code)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<TransportResponse, AnalysisError>>>,
    requests: Mutex<Vec<AnalysisRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(replies: Vec<Result<TransportResponse, AnalysisError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn ok(body: &str) -> Arc<Self> {
        Self::new(vec![Ok(TransportResponse {
            status: 200,
            body: body.to_string(),
        })])
    }

    pub fn refused() -> Arc<Self> {
        Self::new(vec![Err(AnalysisError::Transport(
            "connection refused".to_string(),
        ))])
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("request log lock should work").len()
    }
}

impl AnalysisTransport for ScriptedTransport {
    fn post_json(
        &self,
        _endpoint: &Url,
        request: &AnalysisRequest,
    ) -> Result<TransportResponse, AnalysisError> {
        self.requests
            .lock()
            .expect("request log lock should work")
            .push(request.clone());

        let mut replies = self.replies.lock().expect("reply lock should work");
        if replies.len() > 1 {
            replies.pop_front().expect("reply queue is non-empty")
        } else {
            replies
                .front()
                .cloned()
                .expect("scripted transport needs at least one reply")
        }
    }
}

/// Builds a client over a scripted transport.
#[allow(dead_code)]
pub fn client_with(transport: Arc<ScriptedTransport>) -> AnalysisClient {
    AnalysisClient::new("http://localhost:5000", transport).expect("client should build")
}

/// Phishing payload matching the documented scenario.
#[allow(dead_code)]
pub const PHISHING_BODY: &str = r#"{
    "is_phishing": true,
    "confidence": 0.92,
    "risk_factors": ["suspicious domain age"],
    "external_checks": {"phishtank": {"is_phishing": true}}
}"#;

/// Safe payload matching the documented scenario.
#[allow(dead_code)]
pub const SAFE_BODY: &str = r#"{"is_phishing": false, "confidence": 0.1, "risk_factors": []}"#;

/// One captured HTTP request.
#[allow(dead_code)]
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<String>,
    pub body: String,
}

/// Serves exactly one HTTP response on an ephemeral local port.
///
/// Returns the base URL and a receiver yielding the captured request.
#[allow(dead_code)]
pub fn serve_once(status_line: &str, body: &str) -> (String, Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let address = listener.local_addr().expect("listener should have address");
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("server should accept");
        let mut reader = BufReader::new(stream.try_clone().expect("stream should clone"));

        let mut request_line = String::new();
        reader
            .read_line(&mut request_line)
            .expect("request line should read");

        let mut headers = Vec::new();
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header should read");
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().expect("content-length should parse");
            }
            headers.push(line);
        }

        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("body should read");

        stream
            .write_all(response.as_bytes())
            .expect("response should write");
        let _ = sender.send(CapturedRequest {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8(body).expect("body should be utf-8"),
        });
    });

    (format!("http://{address}"), receiver)
}

/// Accepts one connection on an ephemeral local port and never answers.
///
/// The connection is held open for `hold` so the client times out first.
#[allow(dead_code)]
pub fn serve_silently(hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let address = listener.local_addr().expect("listener should have address");

    thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(hold);
            drop(stream);
        }
    });

    format!("http://{address}")
}

/// Base URL of a local port with nothing listening.
#[allow(dead_code)]
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let address = listener.local_addr().expect("listener should have address");
    drop(listener);
    format!("http://{address}")
}
