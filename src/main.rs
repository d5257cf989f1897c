// SPDX-License-Identifier: GPL-3.0-only

use std::io;
use std::process::ExitCode;
use video_recorder::{Config, app};

fn main() -> ExitCode {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=video_recorder=debug, RUST_LOG=info
    // Output goes to stderr; stdout belongs to the terminal display.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("GIT_VERSION"), "Starting video recorder");

    let result = app::run(Config::default());
    if app::report_exit(&result, &mut io::stdout(), &mut io::stderr()) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
