use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    #[value(name = "on")]
    On,
    #[value(name = "off")]
    Off,
}

impl Switch {
    pub fn enabled(self) -> bool {
        matches!(self, Switch::On)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pictureframe",
    version,
    about = "Browse, upload, delete and pin pictures on a picture frame"
)]
pub struct Cli {
    /// Base URL of the frame, e.g. `http://frame.local:8080`
    #[arg(long, env = "FRAME_BASE_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token for the frame's API
    #[arg(long, env = "FRAME_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Print the session state as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Check whether the frame is reachable and summarise it
    Status,
    /// List pictures, marking the pinned one
    List,
    /// Upload a PNG or JPEG image
    Upload { path: PathBuf },
    /// Delete a picture by id
    Delete { id: String },
    /// Pin a picture so the frame keeps showing it
    Pin { id: String },
    /// Remove the pin from a picture
    Unpin { id: String },
    /// Pin the picture, or unpin it if it is already pinned
    TogglePin { id: String },
    /// Show or change display settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum SettingsCommand {
    Show,
    /// Change only the given settings
    Set {
        #[arg(long, value_enum)]
        display: Option<Switch>,

        /// Seconds between pictures (1-3600)
        #[arg(long)]
        interval: Option<u64>,

        /// Pull an out-of-range interval into 1-3600 instead of rejecting it
        #[arg(long, requires = "interval")]
        clamp: bool,

        #[arg(long, value_enum)]
        shuffle: Option<Switch>,
    },
}
