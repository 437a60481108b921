//! `pictureframe` -- command-line companion for a picture frame.
//!
//! Each invocation performs one operation against the frame's REST API
//! and prints the resulting state. Failures are printed to stderr and
//! produce a non-zero exit code.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default | Description                         |
//! |------------------------------|----------|---------|-------------------------------------|
//! | `FRAME_BASE_URL`             | yes*     | --      | e.g. `http://frame.local:8080`      |
//! | `FRAME_TOKEN`                | yes*     | --      | Bearer token for the frame's API    |
//! | `FRAME_REQUEST_TIMEOUT_SECS` | no       | `5`     | Whole-request timeout               |
//! | `FRAME_CONNECT_TIMEOUT_SECS` | no       | `5`     | TCP connect timeout                 |
//!
//! \* unless passed as `--url` / `--token`.

use std::process::ExitCode;

use clap::Parser;
use pictureframe_cli::args::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pictureframe_cli=info,pictureframe_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match pictureframe_cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
