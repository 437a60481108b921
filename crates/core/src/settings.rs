//! Frame display settings and the partial patch used to edit them.
//!
//! [`FrameSettings`] mirrors the full object returned by
//! `GET /api/settings`. [`PartialSettings`] is the body of
//! `PATCH /api/settings` and only ever carries the fields the user changed.
//! The pinned image is not editable through the patch; pinning has its own
//! endpoints.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Named constants
-------------------------------------------------------------------------- */

/// Shortest rotation interval the editor accepts.
pub const MIN_ROTATE_INTERVAL_SECS: u64 = 1;

/// Longest rotation interval the editor accepts (one hour).
pub const MAX_ROTATE_INTERVAL_SECS: u64 = 3600;

/// Interval shown when the frame has not reported its settings yet.
pub const DEFAULT_ROTATE_INTERVAL_SECS: u64 = 10;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Full remote settings state of the frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSettings {
    pub display_enabled: bool,
    pub rotate_interval_secs: u64,
    pub shuffle: bool,
    /// Filename of the pinned picture, if any.
    pub pinned_image: Option<String>,
}

/// Body of `PATCH /api/settings`.
///
/// Absent fields are omitted from the JSON entirely, so the frame only
/// merges what is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_interval_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle: Option<bool>,
}

impl Default for FrameSettings {
    /// Fallback used by editors when the frame has not reported settings.
    fn default() -> Self {
        Self {
            display_enabled: true,
            rotate_interval_secs: DEFAULT_ROTATE_INTERVAL_SECS,
            shuffle: false,
            pinned_image: None,
        }
    }
}

impl FrameSettings {
    /// Merge a patch into these settings the way the frame does.
    pub fn apply(&mut self, patch: &PartialSettings) {
        if let Some(v) = patch.display_enabled {
            self.display_enabled = v;
        }
        if let Some(v) = patch.rotate_interval_secs {
            self.rotate_interval_secs = v;
        }
        if let Some(v) = patch.shuffle {
            self.shuffle = v;
        }
    }
}

impl PartialSettings {
    /// Build a patch holding only the fields that differ between `before`
    /// and `after`. `pinned_image` is ignored.
    pub fn between(before: &FrameSettings, after: &FrameSettings) -> Self {
        Self {
            display_enabled: (before.display_enabled != after.display_enabled)
                .then_some(after.display_enabled),
            rotate_interval_secs: (before.rotate_interval_secs != after.rotate_interval_secs)
                .then_some(after.rotate_interval_secs),
            shuffle: (before.shuffle != after.shuffle).then_some(after.shuffle),
        }
    }

    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.display_enabled.is_none() && self.rotate_interval_secs.is_none() && self.shuffle.is_none()
    }

    /// Check the patch against the editing bounds.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(secs) = self.rotate_interval_secs {
            validate_rotate_interval(secs)?;
        }
        Ok(())
    }
}

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate that a rotation interval lies within the editor's bounds.
pub fn validate_rotate_interval(secs: u64) -> Result<(), CoreError> {
    if !(MIN_ROTATE_INTERVAL_SECS..=MAX_ROTATE_INTERVAL_SECS).contains(&secs) {
        return Err(CoreError::Validation(format!(
            "Rotate interval must be between {MIN_ROTATE_INTERVAL_SECS} and \
             {MAX_ROTATE_INTERVAL_SECS} seconds (got {secs})"
        )));
    }
    Ok(())
}

/// Clamp a rotation interval into the editor's bounds, as a stepper would.
pub fn clamp_rotate_interval(secs: u64) -> u64 {
    secs.clamp(MIN_ROTATE_INTERVAL_SECS, MAX_ROTATE_INTERVAL_SECS)
}
