//! Shared domain types for the picture frame companion.
//!
//! Everything here is plain data plus local validation: the wire models
//! returned by the frame's REST API, the partial-settings patch, the
//! connection config and credential store, and upload preparation.
//! Nothing in this crate performs network I/O.

pub mod connection;
pub mod error;
pub mod picture;
pub mod settings;
pub mod types;
pub mod upload;
