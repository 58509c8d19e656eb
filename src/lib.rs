use wasm_bindgen::prelude::*;

use crate::domain::logging::LogComponent;

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod presentation;

pub use application::{ChartAdapters, ChartConfig, ChartGroup, TimeSeriesChart};
pub use domain::errors::{ChartError, ChartResult};

/// Installs the console logger, the browser clock and the panic hook.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();
    domain::logging::init_logger(Box::new(infrastructure::services::ConsoleLogger::new_development()));
    domain::logging::init_time_provider(Box::new(infrastructure::services::BrowserTimeProvider::new()));
    log_info!(LogComponent::Presentation("Initialize"), "chart core initialized");
}
