//! Lost & Found Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod dashboard;
mod models;
mod store;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let mut config = AppConfig::from_build_env();
    let override_error = match config::runtime_overrides() {
        Ok(Some(overrides)) => {
            config.apply(overrides);
            None
        }
        Ok(None) => None,
        Err(e) => Some(e),
    };

    if let Err(e) = rolling_logger::init_logger("LostFound", config.log_level) {
        web_sys::console::warn_1(&format!("[APP] Logger not installed: {}", e).into());
    }
    if let Some(e) = override_error {
        log::warn!("[APP] Ignoring runtime config: {}", e);
    }
    log::info!("[APP] Backend at {}", config.backend_url);

    mount_to_body(move || view! { <App config=config /> });
}
