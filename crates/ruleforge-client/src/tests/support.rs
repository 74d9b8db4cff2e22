// crates/ruleforge-client/src/tests/support.rs
// ============================================================================
// Module: Client Test Support Helpers
// Description: In-process HTTP test server with request capture.
// Purpose: Exercise the API client against a real socket.
// Dependencies: hyper, tokio, http-body-util, serde_json
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Captured HTTP request data for assertions.
#[derive(Clone, Debug)]
pub struct CapturedRequest {
    /// Request method.
    pub method: hyper::Method,
    /// Request path without the query.
    pub path: String,
    /// Raw query string, when present.
    pub query: Option<String>,
    /// Request headers.
    pub headers: hyper::HeaderMap,
    /// Raw request body bytes.
    pub body: Bytes,
}

impl CapturedRequest {
    /// Parses the body as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body json")
    }

    /// Returns a header value as text.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_string)
    }
}

/// Test response wrapper.
#[derive(Clone, Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response body bytes.
    pub body: Bytes,
    /// Content type header.
    pub content_type: &'static str,
}

impl TestResponse {
    /// Builds a 200 JSON response.
    pub fn json(value: &Value) -> Self {
        Self::json_status(StatusCode::OK, value)
    }

    /// Builds a JSON response with a custom status.
    pub fn json_status(status: StatusCode, value: &Value) -> Self {
        Self {
            status,
            body: Bytes::from(serde_json::to_vec(value).expect("serialize json response")),
            content_type: "application/json",
        }
    }

    /// Builds a plain-text response.
    pub fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: Bytes::from(body.to_string()),
            content_type: "text/plain",
        }
    }
}

impl From<TestResponse> for Response<Full<Bytes>> {
    fn from(value: TestResponse) -> Self {
        let mut response = Response::new(Full::new(value.body));
        *response.status_mut() = value.status;
        response.headers_mut().insert(
            hyper::header::CONTENT_TYPE,
            hyper::header::HeaderValue::from_static(value.content_type),
        );
        response
    }
}

type Responder = Arc<Mutex<Box<dyn FnMut(&CapturedRequest) -> TestResponse + Send>>>;

/// Lightweight HTTP test server with request capture.
pub struct TestHttpServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl TestHttpServer {
    /// Starts the server with a responder callback.
    pub async fn start<F>(responder: F) -> Self
    where
        F: FnMut(&CapturedRequest) -> TestResponse + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responder: Responder = Arc::new(Mutex::new(Box::new(responder)));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let requests_task = Arc::clone(&requests);
        let responder_task = Arc::clone(&responder);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    accept = listener.accept() => {
                        let Ok((stream, _)) = accept else { continue };
                        let requests = Arc::clone(&requests_task);
                        let responder = Arc::clone(&responder_task);
                        tokio::spawn(async move {
                            let io = TokioIo::new(stream);
                            let service = service_fn(move |req: Request<Incoming>| {
                                let requests = Arc::clone(&requests);
                                let responder = Arc::clone(&responder);
                                async move {
                                    let (parts, body) = req.into_parts();
                                    let bytes = body.collect().await?.to_bytes();
                                    let captured = CapturedRequest {
                                        method: parts.method,
                                        path: parts.uri.path().to_string(),
                                        query: parts.uri.query().map(str::to_string),
                                        headers: parts.headers,
                                        body: bytes,
                                    };
                                    let response = responder.lock().await.as_mut()(&captured);
                                    requests.lock().await.push(captured);
                                    let response: Response<Full<Bytes>> = response.into();
                                    Ok::<_, hyper::Error>(response)
                                }
                            });
                            let _ = http1::Builder::new().serve_connection(io, service).await;
                        });
                    }
                }
            }
        });

        Self {
            addr,
            requests,
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// Returns the base URL for the server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Returns a snapshot of captured requests.
    pub async fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().await.clone()
    }

    /// Shuts down the server.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = self.handle.await;
    }
}
