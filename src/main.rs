//! HouseScope - Housing Investment Analytics Dashboard
//!
//! Loads a historical housing-sales dataset and presents buying, seasonality,
//! renovation, and geographic analyses across six interactive tabs.

mod analysis;
mod data;
mod gui;

use eframe::egui;
use gui::HouseScopeApp;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1200.0, 700.0])
            .with_title("HouseScope"),
        ..Default::default()
    };

    eframe::run_native(
        "HouseScope",
        options,
        Box::new(|cc| Ok(Box::new(HouseScopeApp::new(cc)))),
    )
}
