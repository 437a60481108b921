//! Stateful façade over [`FrameApi`].
//!
//! [`ApiClient`] owns the connection endpoint and the published
//! [`SessionState`]. Every public operation is a single attempt routed
//! through [`ApiClient::run`], which is the only place that flips
//! `reachable`, clears the caches, and sets `error`. Operations never
//! return errors to the caller; observers read the state instead.
//!
//! There is no locking across operations. Two concurrent calls issue two
//! requests and whichever finishes last wins the state.

use std::future::Future;
use std::path::Path;
use std::sync::atomic::AtomicUsize;

use pictureframe_core::connection::{ConnectionConfig, TokenProvider};
use pictureframe_core::picture::Picture;
use pictureframe_core::settings::PartialSettings;
use pictureframe_core::upload::UploadFile;
use tokio::sync::{watch, RwLock};
use url::Url;

use crate::api::{Endpoint, FrameApi};
use crate::config::ClientConfig;
use crate::error::FrameApiError;
use crate::state::{BusyGuard, SessionState};

/// API client for one picture frame, with observable session state.
pub struct ApiClient {
    api: FrameApi,
    endpoint: RwLock<Endpoint>,
    state: watch::Sender<SessionState>,
    uploads_in_flight: AtomicUsize,
}

impl ApiClient {
    /// Create a client for `base_url`, reading the token from `token` on
    /// every request.
    pub fn new(
        config: &ClientConfig,
        base_url: Url,
        token: TokenProvider,
    ) -> Result<Self, FrameApiError> {
        let api = FrameApi::new(config)?;
        Ok(Self::with_api(api, Endpoint::new(Some(base_url), token)))
    }

    /// Create a client from stored credentials.
    ///
    /// An unparseable base URL is not an error here: the client starts
    /// unconfigured and every operation fails until [`update`](Self::update)
    /// points it somewhere valid.
    pub fn from_connection(
        config: &ClientConfig,
        connection: &ConnectionConfig,
        token: TokenProvider,
    ) -> Result<Self, FrameApiError> {
        let base_url = match connection.parse_base_url() {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, "Starting without a usable base URL");
                None
            }
        };
        let api = FrameApi::new(config)?;
        Ok(Self::with_api(api, Endpoint::new(base_url, token)))
    }

    /// Wrap an existing [`FrameApi`].
    pub fn with_api(api: FrameApi, endpoint: Endpoint) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            api,
            endpoint: RwLock::new(endpoint),
            state,
            uploads_in_flight: AtomicUsize::new(0),
        }
    }

    /// Re-point the client at a new frame and token source.
    ///
    /// Session state is left alone; the next operation's outcome decides
    /// reachability.
    pub async fn update(&self, base_url: Url, token: TokenProvider) {
        tracing::info!(base_url = %base_url, "Client re-pointed");
        *self.endpoint.write().await = Endpoint::new(Some(base_url), token);
    }

    pub async fn base_url(&self) -> Option<Url> {
        self.endpoint.read().await.base_url().cloned()
    }

    /// Host present on the base URL and a non-empty token.
    pub async fn is_configured(&self) -> bool {
        self.endpoint.read().await.is_configured()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receive every state change without polling.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Dismiss the current error message.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    // ---- pictures ----

    /// `GET /api/pictures`, replacing `pictures` with the frame's list.
    pub async fn fetch_pictures(&self) {
        let endpoint = self.endpoint().await;
        self.run(
            "fetch_pictures",
            self.api.list_pictures(&endpoint),
            |s, pictures| s.pictures = pictures,
        )
        .await;
    }

    /// `DELETE /api/pictures/{id}`, then refetch the list.
    pub async fn delete(&self, id: &str) {
        let endpoint = self.endpoint().await;
        if self
            .run("delete", self.api.delete_picture(&endpoint, id), |_, ()| {})
            .await
        {
            self.fetch_pictures().await;
        }
    }

    /// `PUT /api/pictures/{id}/pin`, then refetch settings.
    pub async fn pin(&self, id: &str) {
        let endpoint = self.endpoint().await;
        if self
            .run("pin", self.api.pin_picture(&endpoint, id), |_, ()| {})
            .await
        {
            self.fetch_settings().await;
        }
    }

    /// `DELETE /api/pictures/{id}/pin`, then refetch settings.
    pub async fn unpin(&self, id: &str) {
        let endpoint = self.endpoint().await;
        if self
            .run("unpin", self.api.unpin_picture(&endpoint, id), |_, ()| {})
            .await
        {
            self.fetch_settings().await;
        }
    }

    /// Unpin `picture` if it is the pinned one, pin it otherwise.
    pub async fn toggle_pin(&self, picture: &Picture) {
        let pinned = picture.is_pinned_by(self.state.borrow().pinned_image());
        if pinned {
            self.unpin(&picture.id).await;
        } else {
            self.pin(&picture.id).await;
        }
    }

    /// `POST /api/pictures`, then refetch the list.
    ///
    /// `busy` is set for the whole call, refetch included, and reset on
    /// every exit path. Concurrent uploads are not rejected; `busy` stays
    /// set until the last of them finishes.
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str, mime: &str) {
        let _busy = BusyGuard::acquire(&self.state, &self.uploads_in_flight);
        let endpoint = self.endpoint().await;

        tracing::info!(filename, mime, size = bytes.len(), "Uploading picture");
        if self
            .run(
                "upload",
                self.api.upload_picture(&endpoint, bytes, filename, mime),
                |_, ()| {},
            )
            .await
        {
            self.fetch_pictures().await;
        }
    }

    /// Read an image from disk, name it, and [`upload`](Self::upload) it.
    ///
    /// A file that cannot be read never reaches the frame: `error` is set,
    /// but reachability and the caches are untouched.
    pub async fn upload_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Could not read image for upload");
                let message = format!("Could not read {}: {e}", path.display());
                self.state.send_modify(|s| s.error = Some(message));
                return;
            }
        };

        let file = UploadFile::from_bytes(bytes);
        self.upload(file.bytes, &file.filename, file.mime).await;
    }

    // ---- settings ----

    /// `GET /api/settings`, replacing `settings`.
    pub async fn fetch_settings(&self) {
        let endpoint = self.endpoint().await;
        self.run(
            "fetch_settings",
            self.api.get_settings(&endpoint),
            |s, settings| s.settings = Some(settings),
        )
        .await;
    }

    /// `PATCH /api/settings`, replacing `settings` with the frame's echo.
    pub async fn patch_settings(&self, patch: &PartialSettings) {
        let endpoint = self.endpoint().await;
        self.run(
            "patch_settings",
            self.api.patch_settings(&endpoint, patch),
            |s, settings| s.settings = Some(settings),
        )
        .await;
    }

    /// Fetch pictures, then settings if the frame answered.
    pub async fn load_all(&self) {
        self.fetch_pictures().await;
        let reachable = self.state.borrow().reachable;
        if reachable {
            self.fetch_settings().await;
        }
    }

    // ---- private helpers ----

    async fn endpoint(&self) -> Endpoint {
        self.endpoint.read().await.clone()
    }

    /// Await one attempt and record its outcome.
    ///
    /// On success `apply` and `reachable = true` land in a single state
    /// update. On failure the caches are cleared and `error` is set.
    /// Returns whether the attempt succeeded, for follow-up refetches.
    async fn run<T, F>(
        &self,
        operation: &'static str,
        attempt: F,
        apply: impl FnOnce(&mut SessionState, T),
    ) -> bool
    where
        F: Future<Output = Result<T, FrameApiError>>,
    {
        match attempt.await {
            Ok(value) => {
                self.state.send_modify(|s| {
                    apply(s, value);
                    s.mark_reachable();
                });
                true
            }
            Err(e) => {
                if e.is_connectivity() {
                    tracing::warn!(operation, error = %e, "Frame unreachable");
                } else {
                    tracing::error!(operation, error = %e, "Frame request failed");
                }
                let message = e.user_message();
                self.state.send_modify(|s| s.mark_unreachable(message));
                false
            }
        }
    }
}
