//! HTTP client for the picture frame's REST API.
//!
//! [`api::FrameApi`] is the stateless request layer: it joins paths onto
//! the base URL, injects the bearer token, encodes multipart uploads and
//! interprets response status codes. [`client::ApiClient`] wraps it with
//! the session state a UI observes (`pictures`, `settings`, `busy`,
//! `error`, `reachable`) and routes every operation through one
//! success/failure bookkeeping path.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod state;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::FrameApiError;
pub use state::SessionState;
