//! Mock HTTP origin serving canned files for the fetcher to download

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio_util::sync::CancellationToken;

type Files = Arc<Mutex<HashMap<String, (String, Vec<u8>)>>>;

/// Serves registered paths with a fixed content type; everything else is 404
pub struct MockOrigin {
    addr: SocketAddr,
    shutdown: CancellationToken,
    files: Files,
}

impl MockOrigin {
    pub async fn start() -> anyhow::Result<Self> {
        let files = Files::default();

        let app = Router::new().fallback(serve).with_state(Arc::clone(&files));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, files })
    }

    /// Register `path` and return its absolute URL
    pub fn serve(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> String {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), (content_type.to_string(), bytes));
        self.url(path)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for MockOrigin {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn serve(State(files): State<Files>, uri: Uri) -> Response {
    match files.lock().unwrap().get(uri.path()) {
        Some((content_type, bytes)) => ([(header::CONTENT_TYPE, content_type.clone())], bytes.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}
