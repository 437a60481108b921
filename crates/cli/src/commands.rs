//! Command dispatch: run one client operation, then report the state.

use std::process::ExitCode;

use anyhow::{anyhow, Context};
use pictureframe_client::{ApiClient, ClientConfig, SessionState};
use pictureframe_core::connection::{ConnectionConfig, CredentialStore, MemoryCredentialStore};
use pictureframe_core::error::CoreError;
use pictureframe_core::settings::{
    clamp_rotate_interval, validate_rotate_interval, FrameSettings, PartialSettings,
};

use crate::args::{Cli, Command, SettingsCommand, Switch};
use crate::output::{self, View};

/// Execute the parsed command line.
///
/// Client failures are not returned as errors: they land in the session
/// state, are printed to stderr, and turn into a failing exit code.
/// `Err` is reserved for problems found before the frame is contacted.
pub async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let store = MemoryCredentialStore::new(ConnectionConfig::new(
        cli.url.unwrap_or_default(),
        cli.token.unwrap_or_default(),
    ));
    let connection = store.get();
    connection
        .validate()
        .context("Set FRAME_BASE_URL and FRAME_TOKEN, or pass --url and --token")?;

    let client = ApiClient::from_connection(
        &ClientConfig::from_env(),
        &connection,
        store.token_provider(),
    )?;

    let view = execute(&client, cli.command).await?;
    let outcome = Outcome::new(&view, &client.state(), cli.json)?;

    println!("{}", outcome.stdout);
    if let Some(message) = &outcome.error {
        eprintln!("error: {message}");
    }
    Ok(outcome.exit_code())
}

/// What one invocation prints, and whether it failed.
///
/// The state is always rendered, so a failed `status` still shows the
/// frame as unreachable; the error message goes to stderr on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub stdout: String,
    pub error: Option<String>,
}

impl Outcome {
    pub fn new(view: &View, state: &SessionState, json: bool) -> anyhow::Result<Self> {
        let stdout = if json {
            serde_json::to_string_pretty(state)?
        } else {
            output::render(view, state)
        };
        Ok(Self {
            stdout,
            error: state.error.clone(),
        })
    }

    pub fn failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Perform the operation behind `command` and pick what to show afterwards.
pub async fn execute(client: &ApiClient, command: Command) -> anyhow::Result<View> {
    match command {
        Command::Status => {
            client.load_all().await;
            Ok(View::Status)
        }
        Command::List => {
            client.load_all().await;
            Ok(View::Pictures)
        }
        Command::Upload { path } => {
            client.upload_file(&path).await;
            Ok(View::Pictures)
        }
        Command::Delete { id } => {
            client.delete(&id).await;
            Ok(View::Pictures)
        }
        Command::Pin { id } => {
            client.pin(&id).await;
            Ok(View::Settings)
        }
        Command::Unpin { id } => {
            client.unpin(&id).await;
            Ok(View::Settings)
        }
        Command::TogglePin { id } => {
            client.load_all().await;
            let state = client.state();
            if !state.reachable {
                return Ok(View::Settings);
            }
            let picture = state
                .pictures
                .iter()
                .find(|p| p.id == id)
                .ok_or_else(|| anyhow!("No picture with id {id}"))?;
            client.toggle_pin(picture).await;
            Ok(View::Settings)
        }
        Command::Settings {
            action: SettingsCommand::Show,
        } => {
            client.fetch_settings().await;
            Ok(View::Settings)
        }
        Command::Settings {
            action:
                SettingsCommand::Set {
                    display,
                    interval,
                    clamp,
                    shuffle,
                },
        } => {
            let interval = requested_interval(interval, clamp)?;

            client.fetch_settings().await;
            let Some(current) = client.state().settings else {
                return Ok(View::Settings);
            };

            let patch = settings_patch(&current, display, interval, shuffle);
            if patch.is_empty() {
                tracing::info!("Settings unchanged, skipping patch");
                return Ok(View::Message("Settings already up to date".to_string()));
            }
            client.patch_settings(&patch).await;
            Ok(View::Settings)
        }
    }
}

/// Bring a requested interval into bounds, or reject it unless `clamp`.
pub fn requested_interval(interval: Option<u64>, clamp: bool) -> Result<Option<u64>, CoreError> {
    match interval {
        Some(secs) if clamp => Ok(Some(clamp_rotate_interval(secs))),
        Some(secs) => validate_rotate_interval(secs).map(|()| Some(secs)),
        None => Ok(None),
    }
}

/// Apply the requested edits to `current` and keep only what changed.
pub fn settings_patch(
    current: &FrameSettings,
    display: Option<Switch>,
    interval: Option<u64>,
    shuffle: Option<Switch>,
) -> PartialSettings {
    let mut edited = current.clone();
    if let Some(display) = display {
        edited.display_enabled = display.enabled();
    }
    if let Some(secs) = interval {
        edited.rotate_interval_secs = secs;
    }
    if let Some(shuffle) = shuffle {
        edited.shuffle = shuffle.enabled();
    }
    PartialSettings::between(current, &edited)
}
