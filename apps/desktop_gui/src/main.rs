mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::{events::UiEvent, navigation::Route, session::SessionFile};
use crate::ui::{app::DEFAULT_SERVER_URL, DesktopGuiApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Desktop admin for article templates")]
struct Cli {
    #[arg(long, env = "CONTENT_ADMIN_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    /// Bearer token; skips the remembered session when set.
    #[arg(long, env = "CONTENT_ADMIN_TOKEN")]
    token: Option<String>,
    /// Where the signed-in session is remembered.
    #[arg(long)]
    session_file: Option<PathBuf>,
    /// Page to open after sign-in, e.g. `/templates` or `/templates/<id>`.
    #[arg(long, default_value = "/dashboard")]
    route: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let session_file = cli
        .session_file
        .map(SessionFile::new)
        .or_else(SessionFile::default_location);
    if session_file.is_none() {
        tracing::warn!("no config directory available; sign-in will not be remembered");
    }
    let startup = StartupConfig {
        server_url: cli.server_url,
        token: cli.token.filter(|t| !t.trim().is_empty()),
        session_file,
        initial_route: Route::from_path(&cli.route),
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Content Admin")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([360.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Content Admin",
        options,
        Box::new(|_cc| Ok(Box::new(DesktopGuiApp::bootstrap(cmd_tx, ui_rx, startup)))),
    )
}
