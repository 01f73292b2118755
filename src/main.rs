// Rendering helpers are only reached from the wasm frontend and the tests.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod catalog;
mod config;
mod effects;
mod error;
mod facet;
#[cfg(target_arch = "wasm32")]
mod frontend;
mod logging;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use crate::logging::{log_event, LogLevel};
    use serde_json::json;

    let config = config::ReelConfig::from_env();
    let checked = catalog::Catalog::bundled()
        .and_then(|catalog| facet::FacetFilter::from_catalog(&catalog, config.type_match));

    match checked {
        Ok(filter) => {
            let state = filter.state();
            log_event(
                &config,
                LogLevel::Info,
                "catalog_validated",
                json!({
                    "videos": filter.items().len(),
                    "type_buttons": filter.group(facet::Facet::Type).buttons().len(),
                    "format_buttons": filter.group(facet::Facet::Format).buttons().len(),
                    "type": state.active_type,
                    "format": state.active_format,
                    "type_match": config.type_match.as_str(),
                }),
            );
            eprintln!("This project is frontend-only. Run `trunk serve` or `trunk build --release`.");
        }
        Err(err) => {
            log_event(
                &config,
                LogLevel::Error,
                "startup_failed",
                json!({ "error": err.to_string() }),
            );
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
