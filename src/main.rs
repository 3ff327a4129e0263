//! docchat terminal client.
//!
//! Entry point: loads configuration, wires the HTTP backend and the session
//! store into a [`ChatController`], then runs the composer loop while a
//! renderer task draws controller events to stdout. Logs go to stderr.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use docchat::api::HttpBackend;
use docchat::config::{AppConfig, LoggingConfig};
use docchat::controller::{ChatController, ControllerOptions, SubmitOutcome, UploadOutcome};
use docchat::session::FileStore;
use docchat::ui::chat::{Command, Composer, HELP_TEXT, parse_command};
use docchat::ui::terminal::{PROMPT, TerminalRenderer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let config = AppConfig::load().context("Configuration error")?;
    init_tracing(&config.logging);

    let state_path = config.storage.resolved_path();
    info!(
        name: "config.loaded",
        base_url = %config.backend.base_url,
        state_file = %state_path.display(),
        "Configuration loaded"
    );

    let backend = Arc::new(
        HttpBackend::new(&config.backend.base_url).context("Invalid backend base URL")?,
    );
    let store = Arc::new(FileStore::new(state_path));
    let controller = ChatController::new(
        backend,
        store,
        ControllerOptions {
            reveal: config.reveal,
            notification_ttl: config.notifications.ttl(),
        },
    );
    controller.start().await;

    let renderer = tokio::spawn(render_loop(controller.clone()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut composer = Composer::default();
    while let Some(line) = lines.next_line().await.context("Reading stdin")? {
        let Some(entry) = composer.push_line(&line) else {
            continue;
        };
        match parse_command(&entry) {
            Command::Quit => break,
            Command::Help => println!("{HELP_TEXT}"),
            Command::Invalid(reason) => println!("{reason}"),
            Command::Send(text) if text.trim().is_empty() => prompt(),
            command => {
                tokio::spawn(dispatch(controller.clone(), command));
            }
        }
    }

    info!(name: "client.exit", session_id = %controller.session_id(), "Exiting");
    controller.shutdown();
    renderer.abort();
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    // Initialize tracing (M-LOG-STRUCTURED)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let json = logging.json;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(true).with_writer(io::stderr)))
        .init();
}

fn prompt() {
    print!("{PROMPT}");
    let _ = io::stdout().flush();
}

/// Draw controller events until the channel closes.
async fn render_loop(controller: ChatController) {
    let mut events = controller.subscribe();
    let mut renderer = TerminalRenderer::new(io::stdout());
    let _ = renderer.redraw(&controller.snapshot());
    prompt();

    loop {
        let result = match events.recv().await {
            Ok(event) => renderer.apply(&event, &controller.snapshot()),
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(name: "render.lagged", skipped, "Renderer fell behind, redrawing");
                renderer.redraw(&controller.snapshot())
            }
            Err(RecvError::Closed) => break,
        };
        if let Err(e) = result {
            tracing::warn!(name: "render.failed", error = %e, "Could not write to terminal");
            break;
        }
    }
}

/// Run one user action against the controller.
async fn dispatch(controller: ChatController, command: Command) {
    match command {
        Command::Send(text) => {
            if controller.submit(&text).await == SubmitOutcome::Busy {
                println!("Still waiting for the previous reply.");
            }
        }
        Command::Upload(path) => {
            if controller.upload_path(&path).await == UploadOutcome::Busy {
                println!("An upload is already in progress.");
            }
        }
        Command::RemoveDocument => {
            controller.remove_document().await;
        }
        Command::Clear => controller.clear_chat().await,
        Command::Health => {
            controller.check_health().await;
        }
        Command::Refresh => {
            controller.refresh_health().await;
        }
        Command::Close => controller.close_health(),
        Command::Dismiss => controller.dismiss_notification(),
        Command::Help | Command::Quit | Command::Invalid(_) => {}
    }
}
