//! Picture records as listed by `GET /api/pictures`.

use serde::{Deserialize, Serialize};

use crate::types::{timestamp_from_millis, Timestamp};

/// A picture stored on the frame.
///
/// Created server-side by an upload; identity is [`Picture::id`]. The
/// `filename` is what the frame stores in `pinned_image` when the picture
/// is pinned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Picture {
    pub id: String,
    pub filename: String,
    /// Unix epoch milliseconds.
    pub added_at: i64,
}

impl Picture {
    /// Upload time as a UTC timestamp, if `added_at` is in range.
    pub fn added_at_utc(&self) -> Option<Timestamp> {
        timestamp_from_millis(self.added_at)
    }

    /// Whether this picture is the one named by a settings `pinned_image`.
    pub fn is_pinned_by(&self, pinned_image: Option<&str>) -> bool {
        pinned_image == Some(self.filename.as_str())
    }
}
