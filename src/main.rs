use std::sync::Arc;

use eframe::egui;
use portal_finder::{
    api::transport::HttpTransport,
    catalog::Catalog,
    core::{
        settings::SETTINGS_FILE,
        FinderError,
        Settings,
    },
    gui::PortalFinderApp,
    persistence::{
        get_app_data_dir,
        load_json_or_default,
        save_json,
        JsonFavoritesStore,
    },
};
use tracing::{
    info,
    warn,
};

fn main() -> Result<(), FinderError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings: Settings = load_json_or_default(SETTINGS_FILE);
    info!(
        api_base = %settings.api_base,
        data_dir = %get_app_data_dir().display(),
        "portal-finder v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    // Writes defaults back so a first run leaves an editable settings file behind.
    if let Err(e) = save_json(&settings, SETTINGS_FILE) {
        warn!("Failed to save {}: {}", SETTINGS_FILE, e);
    }

    let transport = Arc::new(HttpTransport::new(settings.request_timeout())?);
    let store = Box::new(JsonFavoritesStore::in_app_dir());
    let catalog = Catalog::new(&settings, transport, store)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Portal Finder")
            .with_inner_size([960.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Portal Finder",
        options,
        Box::new(|cc| Ok(Box::new(PortalFinderApp::new(cc, catalog)))),
    )
    .map_err(|e| FinderError::Custom(format!("UI error: {e}")))
}
