//! Map tab: lat/long scatter of best cost-benefit houses with hover details.

use crate::analysis::{AnalysisReport, CandidateHouse};
use crate::gui::tabs::{format_money, no_data_label, section_heading, REGION_COLOR};
use egui::RichText;
use egui_plot::{Plot, PlotPoints, Points};

/// How many candidate rows the preview table shows.
const PREVIEW_ROWS: usize = 20;

/// Hover radius in degrees for the tooltip lookup.
const PICK_RADIUS_DEG: f64 = 0.002;

pub fn show(ui: &mut egui::Ui, report: &AnalysisReport) {
    ui.heading("🗺 Geographic Analysis");
    ui.separator();

    if report.map_candidates.is_empty() {
        no_data_label(ui, "No houses below their regional average to map.");
        return;
    }

    section_heading(ui, "Best Cost-Benefit Houses");
    ui.label(
        RichText::new(format!(
            "{} houses priced below their regional average with condition ≥ 3 and grade ≥ 7.",
            report.map_candidates.len()
        ))
        .size(12.0)
        .weak(),
    );
    ui.add_space(6.0);

    let points: PlotPoints = report
        .map_candidates
        .iter()
        .map(|c| [c.long, c.lat])
        .collect();

    // Moved into the tooltip closure; the hover lookup scans for the nearest
    // candidate around the pointer.
    let candidates: Vec<CandidateHouse> = report.map_candidates.clone();

    Plot::new("candidate_map")
        .height(420.0)
        .allow_scroll(false)
        .data_aspect(1.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(move |_name, value| {
            let nearest = candidates
                .iter()
                .map(|c| {
                    let dx = c.long - value.x;
                    let dy = c.lat - value.y;
                    (c, dx * dx + dy * dy)
                })
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
            match nearest {
                Some((c, dist2)) if dist2.sqrt() <= PICK_RADIUS_DEG => format!(
                    "Price: {}\nRegional avg: {}\nCondition: {}\nBedrooms: {}\nBathrooms: {:.1}",
                    format_money(c.price),
                    format_money(c.avg_price_region),
                    c.condition,
                    c.bedrooms,
                    c.bathrooms,
                ),
                _ => format!("{:.4}, {:.4}", value.y, value.x),
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(2.0)
                    .color(REGION_COLOR.gamma_multiply(0.8))
                    .name("Candidates"),
            );
        });

    section_heading(ui, "Houses Selected for Purchase");
    preview_table(ui, &report.map_candidates);
}

fn preview_table(ui: &mut egui::Ui, candidates: &[CandidateHouse]) {
    egui::Grid::new("map_preview")
        .striped(true)
        .min_col_width(70.0)
        .spacing([10.0, 4.0])
        .show(ui, |ui| {
            for header in [
                "Price",
                "Regional Avg",
                "Zipcode",
                "Bedrooms",
                "Bathrooms",
                "Condition",
                "Grade",
                "View",
                "Waterfront",
            ] {
                ui.label(RichText::new(header).strong().size(11.0));
            }
            ui.end_row();

            for c in candidates.iter().take(PREVIEW_ROWS) {
                ui.label(format_money(c.price));
                ui.label(format_money(c.avg_price_region));
                ui.label(c.zipcode.to_string());
                ui.label(c.bedrooms.to_string());
                ui.label(format!("{:.1}", c.bathrooms));
                ui.label(c.condition.to_string());
                ui.label(c.grade.to_string());
                ui.label(c.view.to_string());
                ui.label(c.waterfront.to_string());
                ui.end_row();
            }
        });
}
