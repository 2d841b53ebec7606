// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SMS gate — host harness.
//
// Entry point. Initialises logging, loads the bridge config, builds the
// platform router, and serves bridge calls as JSON lines over stdio.

mod services;

use smsgate_core::BridgeConfig;
use smsgate_core::human_errors::humanize_error;
use tokio::io::BufReader;

use services::{data_dir, harness};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    // stdout carries responses; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = data_dir::config_path();
    let config = match BridgeConfig::load(&path) {
        Ok(config) => config,
        Err(e) => {
            let human = humanize_error(&e);
            tracing::error!(error = %e, path = %path.display(), "{}", human.message);
            return std::process::ExitCode::FAILURE;
        }
    };

    let router = smsgate_bridge::platform_router(&config);
    tracing::info!(
        channel = router.channel_name(),
        config = %path.display(),
        "SMS gate starting"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    match harness::serve_lines(&router, stdin, tokio::io::stdout()).await {
        Ok(_) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "stdio transport failed");
            std::process::ExitCode::FAILURE
        }
    }
}
