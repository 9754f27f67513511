//! HouseScope Main Application
//! Tab bar, error banner, background dataset loading, and persisted settings.

use crate::analysis::AnalysisReport;
use crate::data::{load_dataset, Dataset, DatasetCache};
use crate::gui::tabs;
use anyhow::Context as _;
use egui::{Color32, RichText};
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;

/// Dataset loaded when no file was picked yet.
pub const DEFAULT_DATASET_PATH: &str = "kc_house_data_updat.csv";

/// The six thematic tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum Tab {
    #[default]
    Overview,
    Buying,
    Seasonality,
    Renovation,
    Map,
    Insights,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Buying,
        Tab::Seasonality,
        Tab::Renovation,
        Tab::Map,
        Tab::Insights,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "📌 Business Context",
            Tab::Buying => "🏡 Buying Strategy",
            Tab::Seasonality => "📈 Seasonality",
            Tab::Renovation => "🛠 Renovation Impact",
            Tab::Map => "🗺 Map",
            Tab::Insights => "🎯 Insights",
        }
    }
}

/// Persisted UI state: dataset path plus the live filter inputs.
#[derive(Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub csv_path: Option<PathBuf>,
    pub tab: Tab,
    pub min_roi: f64,
    /// `None` means "all regions".
    pub selected_zipcode: Option<i32>,
    pub selected_year: Option<i32>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            csv_path: None,
            tab: Tab::Overview,
            min_roi: 0.0,
            selected_zipcode: None,
            selected_year: None,
        }
    }
}

/// Dataset loading result from the background thread.
enum LoadResult {
    Complete {
        path: PathBuf,
        modified: SystemTime,
        dataset: Arc<Dataset>,
        report: Box<AnalysisReport>,
    },
    Error(String),
}

/// Main application window.
pub struct HouseScopeApp {
    pub settings: UserSettings,
    cache: DatasetCache,
    report: Option<AnalysisReport>,
    error: Option<String>,

    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl HouseScopeApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings: UserSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        let mut app = Self {
            settings,
            cache: DatasetCache::new(),
            report: None,
            error: None,
            load_rx: None,
            is_loading: false,
        };

        // Auto-load the last dataset, falling back to the default file.
        let startup_path = app
            .settings
            .csv_path
            .clone()
            .filter(|p| p.exists())
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_DATASET_PATH);
                default.exists().then_some(default)
            });
        if let Some(path) = startup_path {
            app.load_sync(path);
        }

        app
    }

    /// Blocking load through the cache, used at startup before the first
    /// frame is drawn.
    fn load_sync(&mut self, path: PathBuf) {
        match self.cache.load(&path) {
            Ok(dataset) => {
                let report = AnalysisReport::compute(&dataset);
                self.apply_loaded(path, report);
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Open a file dialog and load the picked dataset.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.request_load(path);
        }
    }

    /// Load a dataset, serving from the cache when the file is unchanged,
    /// otherwise reading and recomputing on a background thread.
    fn request_load(&mut self, path: PathBuf) {
        if self.is_loading {
            return;
        }
        self.error = None;

        if let Some(dataset) = self.cache.get_fresh(&path) {
            let report = AnalysisReport::compute(&dataset);
            self.apply_loaded(path, report);
            return;
        }

        self.is_loading = true;
        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = (|| -> anyhow::Result<LoadResult> {
                let modified = fs::metadata(&path)
                    .with_context(|| format!("reading metadata of {}", path.display()))?
                    .modified()?;
                let dataset = Arc::new(
                    load_dataset(&path)
                        .with_context(|| format!("loading dataset {}", path.display()))?,
                );
                let report = Box::new(AnalysisReport::compute(&dataset));
                Ok(LoadResult::Complete {
                    path,
                    modified,
                    dataset,
                    report,
                })
            })();

            let _ = match result {
                Ok(complete) => tx.send(complete),
                Err(e) => tx.send(LoadResult::Error(format!("{e:#}"))),
            };
        });
    }

    fn apply_loaded(&mut self, path: PathBuf, report: AnalysisReport) {
        // Keep a persisted year selection only if it still exists.
        if let Some(year) = self.settings.selected_year {
            if !report.years.contains(&year) {
                self.settings.selected_year = None;
            }
        }
        self.settings.csv_path = Some(path);
        self.report = Some(report);
    }

    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Complete {
                        path,
                        modified,
                        dataset,
                        report,
                    } => {
                        self.cache.insert(path.clone(), modified, dataset);
                        self.apply_loaded(path, *report);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.error = Some(error);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn show_error_banner(&mut self, ctx: &egui::Context) {
        let Some(error) = self.error.clone() else {
            return;
        };
        egui::TopBottomPanel::top("error_banner")
            .frame(
                egui::Frame::none()
                    .fill(Color32::from_rgb(88, 21, 28))
                    .inner_margin(8.0),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {error}"))
                            .color(Color32::from_rgb(248, 215, 218)),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.error = None;
                        }
                    });
                });
            });
    }

    fn show_tab_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("🏠 HouseScope")
                        .size(18.0)
                        .strong()
                        .color(Color32::from_rgb(100, 149, 237)),
                );
                ui.separator();

                for tab in Tab::ALL {
                    if ui
                        .selectable_label(self.settings.tab == tab, tab.label())
                        .clicked()
                    {
                        self.settings.tab = tab;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("📂 Open CSV").clicked() {
                        self.handle_browse_csv();
                    }
                    if self.settings.csv_path.is_some() && ui.button("⟳ Reload").clicked() {
                        // Manual invalidation: re-read even when the mtime
                        // has not changed.
                        if let Some(path) = self.settings.csv_path.clone() {
                            self.cache.invalidate(&path);
                            self.request_load(path);
                        }
                    }
                    if self.is_loading {
                        ui.spinner();
                        ui.label(RichText::new("Loading…").size(11.0).color(Color32::GRAY));
                    } else if let Some(path) = &self.settings.csv_path {
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_default();
                        ui.label(RichText::new(name).size(11.0).color(Color32::GRAY));
                    }
                });
            });
        });
    }
}

impl eframe::App for HouseScopeApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();
        if self.is_loading {
            ctx.request_repaint();
        }

        self.show_error_banner(ctx);
        self.show_tab_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(report) = &self.report else {
                ui.centered_and_justified(|ui| {
                    let message = if self.is_loading {
                        "Loading dataset…"
                    } else {
                        "No dataset loaded. Use \"Open CSV\" to pick a housing-sales file."
                    };
                    ui.label(RichText::new(message).size(16.0).color(Color32::GRAY));
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.settings.tab {
                    Tab::Overview => tabs::overview::show(ui, report),
                    Tab::Buying => tabs::buying::show(ui, &mut self.settings, report),
                    Tab::Seasonality => tabs::seasonality::show(ui, &mut self.settings, report),
                    Tab::Renovation => tabs::renovation::show(ui, report),
                    Tab::Map => tabs::map_view::show(ui, report),
                    Tab::Insights => tabs::insights::show(ui),
                });
        });
    }
}
