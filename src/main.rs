//! docchat
//!
//! Entry point for the terminal document chat client.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use mimalloc::MiMalloc;
use tracing::info;

use docchat::api::HttpBackend;
use docchat::config::AppConfig;
use docchat::controller::ChatController;
use docchat::telemetry;
use docchat::terminal::{self, TerminalView, repl::{self, HELP}};

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    telemetry::init(&config.logging);

    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        upload_path = %config.backend.upload_path,
        chat_path = %config.backend.chat_path,
        timeout_secs = config.backend.request_timeout_secs,
        "Backend configuration loaded"
    );

    let backend = Arc::new(
        HttpBackend::from_config(&config.backend).context("Failed to build HTTP backend")?,
    );
    let view = Arc::new(TerminalView::stdout());
    let controller = Arc::new(ChatController::new(backend, view));

    println!("docchat - connected to {}", config.backend.base_url);
    println!("{HELP}");

    if let Some(path) = &config.startup_upload {
        repl::upload_file(&*controller, Path::new(path), &mut std::io::stdout()).await?;
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    terminal::run(controller, stdin, std::io::stdout()).await?;

    info!(name: "client.exited", "Client exited");
    Ok(())
}
