//! In-process fake picture frame for integration tests.
//!
//! Serves the frame's REST surface on `127.0.0.1:0` with `axum`, keeps its
//! pictures and settings in memory, and records every request so tests can
//! assert on what the client actually sent.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Path, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use pictureframe_client::{ApiClient, ClientConfig};
use pictureframe_core::connection::{static_token, TokenProvider};
use pictureframe_core::picture::Picture;
use pictureframe_core::settings::{FrameSettings, PartialSettings};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

/// Token the fake frame accepts unless a test changes it.
pub const TOKEN: &str = "secret-token";

pub type SharedFrame = Arc<Mutex<FrameState>>;

/// One request as the fake frame saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// One multipart part received on `POST /api/pictures`.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub field_name: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub part_count: usize,
}

/// Mutable device state plus knobs for failure injection.
#[derive(Debug)]
pub struct FrameState {
    pub token: String,
    pub pictures: Vec<Picture>,
    pub settings: FrameSettings,
    pub requests: Vec<RecordedRequest>,
    pub uploads: Vec<RecordedUpload>,
    /// Raw JSON bodies received on `PATCH /api/settings`.
    pub patches: Vec<serde_json::Value>,
    /// Answer every request with this status instead of handling it.
    pub forced_status: Option<StatusCode>,
    /// Status returned for uploads; anything but 201 stores nothing.
    pub upload_status: StatusCode,
    /// Serve `GET /api/pictures` and `GET /api/settings` as broken JSON.
    pub malformed_json: bool,
    /// Sleep before answering.
    pub delay: Option<Duration>,
    next_id: u32,
}

impl FrameState {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            pictures: Vec::new(),
            settings: FrameSettings {
                display_enabled: true,
                rotate_interval_secs: 30,
                shuffle: false,
                pinned_image: None,
            },
            requests: Vec::new(),
            uploads: Vec::new(),
            patches: Vec::new(),
            forced_status: None,
            upload_status: StatusCode::CREATED,
            malformed_json: false,
            delay: None,
            next_id: 0,
        }
    }

    /// Store a picture the way an upload would and return it.
    pub fn add_picture(&mut self, filename: &str) -> Picture {
        self.next_id += 1;
        let picture = Picture {
            id: format!("pic-{}", self.next_id),
            filename: filename.to_string(),
            added_at: 1_715_600_000_000 + i64::from(self.next_id),
        };
        self.pictures.push(picture.clone());
        picture
    }

    /// Number of recorded requests with this method and path.
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

/// A running fake frame. The server task stops when this is dropped.
pub struct FakeFrame {
    pub base_url: Url,
    pub state: SharedFrame,
    handle: JoinHandle<()>,
}

impl Drop for FakeFrame {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl FakeFrame {
    /// Start a fake frame accepting [`TOKEN`].
    pub async fn spawn() -> Self {
        Self::spawn_with_token(TOKEN).await
    }

    pub async fn spawn_with_token(token: &str) -> Self {
        let state: SharedFrame = Arc::new(Mutex::new(FrameState::new(token)));
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            state,
            handle,
        }
    }

    /// A client pointed at this frame with the accepted token.
    pub fn client(&self) -> ApiClient {
        self.client_with(static_token(TOKEN))
    }

    pub fn client_with(&self, token: TokenProvider) -> ApiClient {
        ApiClient::new(&ClientConfig::default(), self.base_url.clone(), token).unwrap()
    }
}

/// A base URL where nothing is listening.
pub async fn closed_port_url() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// Smallest byte sequence `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4];

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

fn router(state: SharedFrame) -> Router {
    Router::new()
        .route("/api/pictures", get(list_pictures).post(upload_picture))
        .route("/api/pictures/{id}", delete(delete_picture))
        .route("/api/pictures/{id}/pin", put(pin_picture).delete(unpin_picture))
        .route("/api/settings", get(get_settings).patch(patch_settings))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            record_and_authorize,
        ))
        .with_state(state)
}

async fn record_and_authorize(
    State(state): State<SharedFrame>,
    request: Request,
    next: Next,
) -> Response {
    let (delay, forced, authorized) = {
        let mut s = state.lock().await;
        let authorization = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let expected = format!("Bearer {}", s.token);
        let authorized = authorization.as_deref() == Some(expected.as_str());
        s.requests.push(RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            authorization,
        });
        (s.delay, s.forced_status, authorized)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if let Some(status) = forced {
        return status.into_response();
    }
    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

async fn list_pictures(State(state): State<SharedFrame>) -> Response {
    let s = state.lock().await;
    if s.malformed_json {
        return (StatusCode::OK, "[{\"id\": ").into_response();
    }
    Json(s.pictures.clone()).into_response()
}

async fn upload_picture(State(state): State<SharedFrame>, mut multipart: Multipart) -> Response {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let Ok(bytes) = field.bytes().await else {
            return StatusCode::BAD_REQUEST.into_response();
        };
        parts.push((field_name, filename, content_type, bytes.to_vec()));
    }

    let part_count = parts.len();
    let Some((field_name, filename, content_type, bytes)) = parts.into_iter().next() else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut s = state.lock().await;
    s.uploads.push(RecordedUpload {
        field_name,
        filename: filename.clone(),
        content_type,
        bytes,
        part_count,
    });

    if s.upload_status != StatusCode::CREATED {
        return s.upload_status.into_response();
    }
    let picture = s.add_picture(&filename.unwrap_or_default());
    (StatusCode::CREATED, Json(picture)).into_response()
}

async fn delete_picture(State(state): State<SharedFrame>, Path(id): Path<String>) -> StatusCode {
    let mut s = state.lock().await;
    let Some(index) = s.pictures.iter().position(|p| p.id == id) else {
        return StatusCode::NOT_FOUND;
    };
    let removed = s.pictures.remove(index);
    if s.settings.pinned_image.as_deref() == Some(removed.filename.as_str()) {
        s.settings.pinned_image = None;
    }
    StatusCode::NO_CONTENT
}

async fn pin_picture(State(state): State<SharedFrame>, Path(id): Path<String>) -> StatusCode {
    let mut s = state.lock().await;
    let Some(filename) = s
        .pictures
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.filename.clone())
    else {
        return StatusCode::NOT_FOUND;
    };
    s.settings.pinned_image = Some(filename);
    StatusCode::NO_CONTENT
}

async fn unpin_picture(State(state): State<SharedFrame>, Path(_id): Path<String>) -> StatusCode {
    state.lock().await.settings.pinned_image = None;
    StatusCode::NO_CONTENT
}

async fn get_settings(State(state): State<SharedFrame>) -> Response {
    let s = state.lock().await;
    if s.malformed_json {
        return (StatusCode::OK, "{\"display_enabled\": tru").into_response();
    }
    Json(s.settings.clone()).into_response()
}

async fn patch_settings(
    State(state): State<SharedFrame>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let Ok(patch) = serde_json::from_value::<PartialSettings>(body.clone()) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };
    let mut s = state.lock().await;
    s.patches.push(body);
    s.settings.apply(&patch);
    Json(s.settings.clone()).into_response()
}
