// Chat Desk - Main Entry Point
// Native desktop client for the chat assistant backend

mod app;
mod dialogs;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use chat_desk_backend::chat::{Bridge, HttpTransport};
use chat_desk_backend::config::Config;
use chat_desk_backend::state::{ChatController, FileStorage};
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::ChatDeskApp;

fn main() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = Config::from_env();
    info!(
        endpoint = %config.chat.api_endpoint,
        data_dir = %config.storage.data_dir.display(),
        "Configuration loaded"
    );

    let transport = Arc::new(HttpTransport::new(&config.chat));
    let bridge = Bridge::new(transport).context("Failed to start the network runtime")?;
    let storage = Arc::new(FileStorage::new(&config.storage.data_dir));
    let controller = ChatController::new(bridge, storage);
    let app = ChatDeskApp::new(
        controller,
        config.chat.api_endpoint.clone(),
        config.storage.exports_dir(),
    );

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Chat Desk")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chat Desk",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            app.set_waker(Arc::new(move || ctx.request_repaint()));
            Box::new(app)
        }),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {}", e))
}
