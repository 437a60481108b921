//! Plain-text rendering of the client's session state.

use std::fmt::Write;

use pictureframe_client::SessionState;
use pictureframe_core::settings::FrameSettings;

/// What a command wants shown once it has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Status,
    Pictures,
    Settings,
    Message(String),
}

pub fn render(view: &View, state: &SessionState) -> String {
    match view {
        View::Status => render_status(state),
        View::Pictures => render_pictures(state),
        View::Settings => match &state.settings {
            Some(settings) => render_settings(settings),
            None => "Settings unknown".to_string(),
        },
        View::Message(message) => message.clone(),
    }
}

pub fn render_status(state: &SessionState) -> String {
    let mut out = String::new();
    let reachability = if state.reachable { "reachable" } else { "unreachable" };
    let _ = writeln!(out, "Frame:    {reachability}");
    let _ = writeln!(out, "Pictures: {}", state.pictures.len());
    let _ = write!(out, "Pinned:   {}", state.pinned_image().unwrap_or("none"));
    out
}

/// One line per picture; `*` marks the pinned one.
pub fn render_pictures(state: &SessionState) -> String {
    if state.pictures.is_empty() {
        return "No pictures".to_string();
    }

    let pinned = state.pinned_image();
    state
        .pictures
        .iter()
        .map(|picture| {
            let marker = if picture.is_pinned_by(pinned) { '*' } else { ' ' };
            let added = picture
                .added_at_utc()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            format!("{marker} {}  {}  {added}", picture.id, picture.filename)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_settings(settings: &FrameSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Display:  {}", on_off(settings.display_enabled));
    let _ = writeln!(out, "Interval: {}s", settings.rotate_interval_secs);
    let _ = writeln!(out, "Shuffle:  {}", on_off(settings.shuffle));
    let _ = write!(
        out,
        "Pinned:   {}",
        settings.pinned_image.as_deref().unwrap_or("none")
    );
    out
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
