//! Mock Google Cloud Storage JSON API
//!
//! Serves the download, simple upload and object ACL endpoints for any
//! bucket, plus `/public/{bucket}/{object}` for reading public objects back.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
struct MockGcsState {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    public: Mutex<HashSet<(String, String)>>,
    /// Reject ACL updates the way buckets with uniform access do
    reject_acl: bool,
}

/// In-memory GCS stand-in
pub struct MockGcs {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockGcsState>,
}

impl MockGcs {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(false).await
    }

    /// Start a mock whose ACL endpoint always answers 400
    pub async fn start_rejecting_acl() -> anyhow::Result<Self> {
        Self::start_inner(true).await
    }

    async fn start_inner(reject_acl: bool) -> anyhow::Result<Self> {
        let state = Arc::new(MockGcsState {
            reject_acl,
            ..MockGcsState::default()
        });

        let app = Router::new()
            .route("/storage/v1/b/{bucket}/o/{object}", routing::get(download))
            .route("/storage/v1/b/{bucket}/o/{object}/acl", routing::post(insert_acl))
            .route("/upload/storage/v1/b/{bucket}/o", routing::post(upload))
            .route("/public/{bucket}/{*object}", routing::get(public_read))
            .with_state(Arc::clone(&state));

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

        Ok(Self { addr, shutdown, state })
    }

    /// API endpoint to put in `storage.backend.endpoint`
    pub fn endpoint(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn put(&self, bucket: &str, object: &str, bytes: Vec<u8>, content_type: &str) {
        self.state.objects.lock().unwrap().insert(
            (bucket.to_string(), object.to_string()),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
    }

    pub fn get(&self, bucket: &str, object: &str) -> Option<StoredObject> {
        self.state
            .objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), object.to_string()))
            .cloned()
    }

    /// Names of every object in `bucket`
    pub fn objects(&self, bucket: &str) -> Vec<String> {
        self.state
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, object)| object.clone())
            .collect()
    }

    pub fn is_public(&self, bucket: &str, object: &str) -> bool {
        self.state
            .public
            .lock()
            .unwrap()
            .contains(&(bucket.to_string(), object.to_string()))
    }
}

impl Drop for MockGcs {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({ "error": { "code": status.as_u16(), "message": message } })),
    )
        .into_response()
}

#[derive(Deserialize)]
struct DownloadQuery {
    alt: Option<String>,
}

async fn download(
    State(state): State<Arc<MockGcsState>>,
    Path((bucket, object)): Path<(String, String)>,
    Query(query): Query<DownloadQuery>,
) -> Response {
    if query.alt.as_deref() != Some("media") {
        return error(StatusCode::BAD_REQUEST, "only alt=media is supported");
    }

    match state.objects.lock().unwrap().get(&(bucket, object)) {
        Some(stored) => (
            [(header::CONTENT_TYPE, stored.content_type.clone())],
            stored.bytes.clone(),
        )
            .into_response(),
        None => error(StatusCode::NOT_FOUND, "No such object"),
    }
}

#[derive(Deserialize)]
struct UploadQuery {
    #[serde(rename = "uploadType")]
    upload_type: String,
    name: String,
}

async fn upload(
    State(state): State<Arc<MockGcsState>>,
    Path(bucket): Path<String>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if query.upload_type != "media" {
        return error(StatusCode::BAD_REQUEST, "only uploadType=media is supported");
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let size = body.len();
    state.objects.lock().unwrap().insert(
        (bucket.clone(), query.name.clone()),
        StoredObject {
            bytes: body.to_vec(),
            content_type: content_type.clone(),
        },
    );

    Json(json!({
        "bucket": bucket,
        "name": query.name,
        "contentType": content_type,
        "size": size.to_string(),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct AclEntry {
    entity: String,
    role: String,
}

async fn insert_acl(
    State(state): State<Arc<MockGcsState>>,
    Path((bucket, object)): Path<(String, String)>,
    Json(entry): Json<AclEntry>,
) -> Response {
    if state.reject_acl {
        return error(
            StatusCode::BAD_REQUEST,
            "Cannot insert legacy ACL for an object when uniform bucket-level access is enabled",
        );
    }

    let key = (bucket, object);
    if !state.objects.lock().unwrap().contains_key(&key) {
        return error(StatusCode::NOT_FOUND, "No such object");
    }

    if entry.entity == "allUsers" && entry.role == "READER" {
        state.public.lock().unwrap().insert(key);
    }

    Json(json!({ "entity": entry.entity, "role": entry.role })).into_response()
}

async fn public_read(
    State(state): State<Arc<MockGcsState>>,
    Path((bucket, object)): Path<(String, String)>,
) -> Response {
    let key = (bucket, object);
    if !state.public.lock().unwrap().contains(&key) {
        return error(StatusCode::FORBIDDEN, "Access denied");
    }

    match state.objects.lock().unwrap().get(&key) {
        Some(stored) => (
            [(header::CONTENT_TYPE, stored.content_type.clone())],
            stored.bytes.clone(),
        )
            .into_response(),
        None => error(StatusCode::NOT_FOUND, "No such object"),
    }
}
