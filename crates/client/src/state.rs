//! Session state published to observers of [`ApiClient`](crate::ApiClient).

use std::sync::atomic::{AtomicUsize, Ordering};

use pictureframe_core::picture::Picture;
use pictureframe_core::settings::FrameSettings;
use serde::Serialize;
use tokio::sync::watch;

/// Snapshot of everything a UI renders from the client.
///
/// Not persisted. `reachable` starts out `false` and afterwards reflects
/// only the outcome of the most recently completed operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionState {
    pub reachable: bool,
    pub pictures: Vec<Picture>,
    pub settings: Option<FrameSettings>,
    /// An upload is in flight.
    pub busy: bool,
    /// Last user-facing failure message, until cleared.
    pub error: Option<String>,
}

impl SessionState {
    /// Filename of the pinned picture, if settings are known and one is pinned.
    pub fn pinned_image(&self) -> Option<&str> {
        self.settings
            .as_ref()
            .and_then(|settings| settings.pinned_image.as_deref())
    }

    /// Record a successful operation.
    pub(crate) fn mark_reachable(&mut self) {
        self.reachable = true;
    }

    /// Record a failed operation: drop the caches so the UI falls back to
    /// its disconnected presentation.
    pub(crate) fn mark_unreachable(&mut self, message: String) {
        self.reachable = false;
        self.pictures.clear();
        self.settings = None;
        self.error = Some(message);
    }
}

/// Holds `busy = true` for as long as it lives.
///
/// Dropping the guard releases it, so every exit path of an upload
/// (success, failure, early return) is covered. Overlapping uploads share
/// `in_flight`; `busy` drops back to false only when the last guard goes.
/// The counter is only touched inside `send_modify`, which serialises it
/// with the flag.
pub(crate) struct BusyGuard<'a> {
    state: &'a watch::Sender<SessionState>,
    in_flight: &'a AtomicUsize,
}

impl<'a> BusyGuard<'a> {
    pub(crate) fn acquire(
        state: &'a watch::Sender<SessionState>,
        in_flight: &'a AtomicUsize,
    ) -> Self {
        state.send_modify(|s| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            s.busy = true;
        });
        Self { state, in_flight }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.state.send_modify(|s| {
            s.busy = in_flight.fetch_sub(1, Ordering::SeqCst) > 1;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> SessionState {
        SessionState {
            reachable: true,
            pictures: vec![Picture {
                id: "1".into(),
                filename: "1.jpg".into(),
                added_at: 0,
            }],
            settings: Some(FrameSettings {
                pinned_image: Some("1.jpg".into()),
                ..Default::default()
            }),
            busy: false,
            error: None,
        }
    }

    #[test]
    fn initial_state_is_unreachable_and_empty() {
        let state = SessionState::default();
        assert!(!state.reachable);
        assert!(state.pictures.is_empty());
        assert!(state.settings.is_none());
        assert!(!state.busy);
        assert!(state.error.is_none());
    }

    #[test]
    fn failure_clears_caches() {
        let mut state = populated();
        state.mark_unreachable("nope".into());
        assert!(!state.reachable);
        assert!(state.pictures.is_empty());
        assert!(state.settings.is_none());
        assert_eq!(state.error.as_deref(), Some("nope"));
    }

    #[test]
    fn success_keeps_previous_error() {
        let mut state = SessionState {
            error: Some("old".into()),
            ..Default::default()
        };
        state.mark_reachable();
        assert!(state.reachable);
        assert_eq!(state.error.as_deref(), Some("old"));
    }

    #[test]
    fn pinned_image_reads_through_settings() {
        assert_eq!(populated().pinned_image(), Some("1.jpg"));
        assert_eq!(SessionState::default().pinned_image(), None);
    }

    #[test]
    fn busy_guard_resets_on_drop() {
        let (tx, rx) = watch::channel(SessionState::default());
        let in_flight = AtomicUsize::new(0);
        {
            let _guard = BusyGuard::acquire(&tx, &in_flight);
            assert!(rx.borrow().busy);
        }
        assert!(!rx.borrow().busy);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn busy_holds_until_last_overlapping_guard_drops() {
        let (tx, rx) = watch::channel(SessionState::default());
        let in_flight = AtomicUsize::new(0);

        let first = BusyGuard::acquire(&tx, &in_flight);
        let second = BusyGuard::acquire(&tx, &in_flight);
        drop(first);
        assert!(rx.borrow().busy, "second upload still running");

        drop(second);
        assert!(!rx.borrow().busy);
    }
}
