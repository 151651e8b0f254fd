mod app;
mod config;
mod error;
mod export;
mod ingest;
mod layout;
mod render;
mod session;

use app::*;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let loaded = AppConfig::from_document();
    let config = loaded.clone().unwrap_or_default();
    let max_level = config.max_log_level().unwrap_or(tracing::Level::INFO);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(max_level)
            .build(),
    );
    if let Err(err) = loaded {
        tracing::warn!(error = %err, "falling back to default configuration");
    }
    tracing::debug!(?config, "starting");

    mount_to_body(move || view! { <App config=config /> })
}
