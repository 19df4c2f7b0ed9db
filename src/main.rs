//! FIASKCHAT desktop client
//!
//! Architecture:
//! - Main thread: runs the egui UI and dispatches channel events to the widget
//! - Backend thread: runs a Tokio runtime for async network I/O
//! - Communication via crossbeam channels

use std::path::PathBuf;

use clap::Parser;
use eframe::egui;

use fiaskchat_client::app::ChatApp;
use fiaskchat_client::config::{self, Settings};
use fiaskchat_client::error::Error;

#[derive(Parser)]
#[command(name = "fiaskchat", version, about = "Desktop client for FIASKCHAT rooms")]
struct Cli {
    /// Path to a JSON settings file (defaults to the per-user config dir)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Server address as host[:port]
    #[arg(long, value_name = "HOST:PORT")]
    server: Option<String>,
    /// Display name announced to the room
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    room: Option<String>,
    /// Connect over TLS
    #[arg(long)]
    tls: bool,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(server) = &self.server {
            settings.server = server.clone();
        }
        if let Some(name) = &self.name {
            settings.name = name.clone();
        }
        if let Some(room) = &self.room {
            settings.room = room.clone();
        }
        if self.tls {
            settings.use_tls = true;
        }
    }
}

/// Settings after file, flags, and validation. Saved first if asked.
fn prepare_settings(cli: &Cli) -> Result<Settings, Error> {
    let mut settings = match &cli.config {
        Some(path) => config::load_settings_from(path)?,
        None => config::load_settings(),
    };
    cli.apply(&mut settings);

    // Refuse to start with parameters the server would reject
    let params = settings.connect_params()?;
    log::info!("Joining `{}` on {}:{} as {}", params.room, params.server, params.port, params.name);

    if cli.save_config {
        match &cli.config {
            Some(path) => config::save_settings_to(path, &settings)?,
            None => config::save_settings(&settings)?,
        }
    }
    Ok(settings)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let settings = prepare_settings(&cli)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        "FIASKCHAT",
        options,
        Box::new(move |cc| Ok(Box::new(ChatApp::new(cc, settings)))),
    )?;
    Ok(())
}
