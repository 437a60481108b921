//! Preparing image bytes for `POST /api/pictures`.
//!
//! The frame accepts PNG and JPEG. Anything that does not sniff as PNG is
//! sent as JPEG, and the upload is named with a fresh UUID so two uploads
//! never collide on the device.

use image::ImageFormat;

/// MIME type sent for PNG uploads.
pub const MIME_PNG: &str = "image/png";

/// MIME type sent for everything else.
pub const MIME_JPEG: &str = "image/jpeg";

/// Image bytes plus the filename and MIME type they will be uploaded with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
}

impl UploadFile {
    /// Sniff the image format and derive a unique filename for it.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let (ext, mime) = extension_and_mime(&bytes);
        let filename = format!("{}.{ext}", uuid::Uuid::new_v4());
        Self {
            bytes,
            filename,
            mime,
        }
    }
}

/// `("png", "image/png")` for PNG data, `("jpg", "image/jpeg")` otherwise.
pub fn extension_and_mime(bytes: &[u8]) -> (&'static str, &'static str) {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => ("png", MIME_PNG),
        _ => ("jpg", MIME_JPEG),
    }
}
