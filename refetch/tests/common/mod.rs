#![allow(dead_code)]
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode, body::Incoming};
use hyper_util::rt::TokioIo;
use refetch::cache::{CacheEntry, CacheError, CacheStore};
use refetch::{
    Logger, Transport, TransportError, TransportRequest, TransportResponse,
};
use serde_json::Value;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// One scripted transport behaviour.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(u16, &'static str),
    Fail(&'static str),
    Slow(Duration, u16, &'static str),
    Hang,
}

impl Reply {
    async fn resolve(self) -> Result<TransportResponse, TransportError> {
        match self {
            Reply::Json(status, body) => Ok(TransportResponse::new(status, body)),
            Reply::Fail(message) => Err(TransportError::Connect(message.into())),
            Reply::Slow(delay, status, body) => {
                tokio::time::sleep(delay).await;
                Ok(TransportResponse::new(status, body))
            }
            Reply::Hang => std::future::pending().await,
        }
    }
}

/// Transport that plays back scripted replies, then repeats `fallback`.
#[derive(Debug)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: AtomicUsize,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn always(reply: Reply) -> Arc<Self> {
        Self::scripted(vec![], reply)
    }

    pub fn scripted(replies: Vec<Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            fallback,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(
        &self,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or_else(|| self.fallback.clone()).resolve().await
    }
}

/// Cache backend that is always down.
#[derive(Debug, Default)]
pub struct FailingCache;

#[async_trait]
impl CacheStore<Value> for FailingCache {
    async fn get(
        &self,
        _key: &str,
    ) -> Result<Option<CacheEntry<Value>>, CacheError> {
        Err(CacheError::Unavailable("backend down".into()))
    }

    async fn set(
        &self,
        _key: &str,
        _value: Value,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("backend down".into()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("backend down".into()))
    }

    async fn len(&self) -> Result<usize, CacheError> {
        Err(CacheError::Unavailable("backend down".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Logger that keeps every line for assertions.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, line)| line.clone())
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines(level).iter().any(|line| line.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        self.lines.lock().unwrap().push((level, message.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Local HTTP server for exercising the reqwest transport.
///
/// Routes:
/// - `/todo` -> 200 `{"id":1,"title":"todo"}`
/// - `/bad-json` -> 200 `not-json`
/// - `/echo-token` -> 200 `{"token": <x-token header>}`
/// - `/slow` -> 200 after 500ms
/// - anything else -> 404 `not found`
pub struct TestServer {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl TestServer {
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;
        let hits = Arc::new(AtomicUsize::new(0));

        let server_hits = hits.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let io = TokioIo::new(stream);
                let hits = server_hits.clone();
                let service = service_fn(move |req| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        handle(req).await
                    }
                });
                tokio::spawn(async move {
                    if let Err(err) =
                        http1::Builder::new().serve_connection(io, service).await
                    {
                        tracing::debug!(?err, "test server connection error");
                    }
                });
            }
        });

        Ok(Self { addr, hits })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn handle(
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let (status, body) = match req.uri().path() {
        "/todo" => (StatusCode::OK, r#"{"id":1,"title":"todo"}"#.to_string()),
        "/bad-json" => (StatusCode::OK, "not-json".to_string()),
        "/echo-token" => {
            let token = req
                .headers()
                .get("x-token")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            (StatusCode::OK, serde_json::json!({ "token": token }).to_string())
        }
        "/slow" => {
            tokio::time::sleep(Duration::from_millis(500)).await;
            (StatusCode::OK, "{}".to_string())
        }
        _ => (StatusCode::NOT_FOUND, "not found".to_string()),
    };

    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())));
    Ok(response)
}
