//! Buying Strategy tab: curated recommendations, ROI, and regional charts.

use crate::analysis::{AnalysisReport, RecommendedHouse, BENCHMARK_ZIPCODE};
use crate::gui::tabs::{
    format_money, format_pct, no_data_label, section_heading, BENCHMARK_COLOR, REGION_COLOR,
    ROI_COLOR, SELL_COLOR,
};
use crate::gui::UserSettings;
use egui::{ComboBox, RichText};
use egui_plot::{Bar, BarChart, HLine, Legend, Plot, PlotPoints, Points};

pub fn show(ui: &mut egui::Ui, settings: &mut UserSettings, report: &AnalysisReport) {
    ui.heading("🏡 Buying Strategy");
    ui.separator();

    if report.recommended.is_empty() {
        no_data_label(
            ui,
            "The curated recommendation snapshot does not match this dataset.",
        );
    } else {
        section_heading(ui, "📋 Recommended Houses");
        recommended_table(ui, &report.recommended);

        section_heading(ui, "Return on Investment (ROI)");
        roi_scatter(ui, &report.recommended);
    }

    section_heading(ui, "📊 Mean Price by Region");
    top_regions_chart(ui, report);

    section_heading(ui, "📈 Yearly Appreciation by Region");
    appreciation_chart(ui, report);
    if let Some(change) = report.benchmark_pct_change {
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!(
                "Mean yearly appreciation of zipcode {}: {:.1}%",
                BENCHMARK_ZIPCODE,
                change * 100.0
            ))
            .strong(),
        );
    }

    if !report.recommended.is_empty() {
        section_heading(ui, "🔍 Selected Property Details");
        detail_table(ui, settings, report);
    }
}

fn recommended_table(ui: &mut egui::Ui, recommended: &[RecommendedHouse]) {
    egui::Grid::new("recommended_houses")
        .striped(true)
        .min_col_width(60.0)
        .spacing([10.0, 4.0])
        .show(ui, |ui| {
            for header in [
                "Index",
                "Price",
                "Regional Avg",
                "Zipcode",
                "Bedrooms",
                "Bathrooms",
                "Condition",
                "Grade",
                "View",
                "Waterfront",
                "ROI",
            ] {
                ui.label(RichText::new(header).strong().size(11.0));
            }
            ui.end_row();

            for row in recommended {
                let h = &row.house;
                ui.label(h.row_index.to_string());
                ui.label(format_money(h.price));
                ui.label(format_money(h.avg_price_region));
                ui.label(h.zipcode.to_string());
                ui.label(h.bedrooms.to_string());
                ui.label(format!("{:.1}", h.bathrooms));
                ui.label(h.condition.to_string());
                ui.label(h.grade.to_string());
                ui.label(h.view.to_string());
                ui.label(h.waterfront.to_string());
                ui.label(RichText::new(format_pct(row.roi_pct)).color(ROI_COLOR));
                ui.end_row();
            }
        });
}

fn roi_scatter(ui: &mut egui::Ui, recommended: &[RecommendedHouse]) {
    let labels: Vec<String> = recommended
        .iter()
        .map(|r| r.house.row_index.to_string())
        .collect();
    let points: PlotPoints = recommended
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.roi_pct.map(|roi| [i as f64, roi]))
        .collect();

    Plot::new("roi_scatter")
        .height(260.0)
        .allow_scroll(false)
        .x_axis_label("Property Index")
        .y_axis_label("Expected ROI (%)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if mark.value.fract().abs() < 0.01 && idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(5.0)
                    .color(ROI_COLOR)
                    .name("ROI"),
            );
        });
}

fn top_regions_chart(ui: &mut egui::Ui, report: &AnalysisReport) {
    if report.top_regions.is_empty() {
        no_data_label(ui, "No regional averages available.");
        return;
    }

    let labels: Vec<String> = report
        .top_regions
        .iter()
        .map(|(zipcode, _)| zipcode.to_string())
        .collect();
    let bars: Vec<Bar> = report
        .top_regions
        .iter()
        .enumerate()
        .map(|(i, &(zipcode, mean))| {
            let color = if zipcode == BENCHMARK_ZIPCODE {
                BENCHMARK_COLOR
            } else {
                REGION_COLOR
            };
            Bar::new(i as f64, mean).width(0.6).fill(color)
        })
        .collect();

    Plot::new("top_regions")
        .height(260.0)
        .allow_scroll(false)
        .x_axis_label("Zipcode")
        .y_axis_label("Mean Price (US$)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if mark.value.fract().abs() < 0.01 && idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Mean price"));
        });
    ui.label(
        RichText::new(format!(
            "Top regions by mean price; zipcode {BENCHMARK_ZIPCODE} highlighted for comparison."
        ))
        .size(11.0)
        .weak(),
    );
}

fn appreciation_chart(ui: &mut egui::Ui, report: &AnalysisReport) {
    let top: Vec<(i32, f64)> = report.pct_change_ranking.iter().copied().take(10).collect();
    if top.is_empty() {
        no_data_label(
            ui,
            "Appreciation needs at least two observed years per region.",
        );
        return;
    }

    let labels: Vec<String> = top.iter().map(|(zipcode, _)| zipcode.to_string()).collect();
    let bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, &(_, change))| Bar::new(i as f64, change * 100.0).width(0.6).fill(REGION_COLOR))
        .collect();

    Plot::new("appreciation")
        .height(260.0)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("Zipcode")
        .y_axis_label("Mean Yearly Appreciation (%)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if mark.value.fract().abs() < 0.01 && idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Top regions"));
            if let Some(change) = report.benchmark_pct_change {
                plot_ui.hline(
                    HLine::new(change * 100.0)
                        .color(SELL_COLOR)
                        .style(egui_plot::LineStyle::Dashed { length: 10.0 })
                        .name(format!("Zipcode {BENCHMARK_ZIPCODE}")),
                );
            }
        });
}

fn detail_table(ui: &mut egui::Ui, settings: &mut UserSettings, report: &AnalysisReport) {
    let max_roi = report.max_recommended_roi().ceil().max(1.0);
    settings.min_roi = settings.min_roi.clamp(0.0, max_roi);

    ui.horizontal(|ui| {
        ui.label("Minimum ROI (%):");
        ui.add(egui::Slider::new(&mut settings.min_roi, 0.0..=max_roi).fixed_decimals(0));

        ui.add_space(20.0);

        ui.label("Region:");
        let selected_text = settings
            .selected_zipcode
            .map(|z| z.to_string())
            .unwrap_or_else(|| "All".to_string());
        ComboBox::from_id_salt("detail_zipcode")
            .width(100.0)
            .selected_text(selected_text)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(settings.selected_zipcode.is_none(), "All")
                    .clicked()
                {
                    settings.selected_zipcode = None;
                }
                for zipcode in report.recommended_zipcodes() {
                    if ui
                        .selectable_label(
                            settings.selected_zipcode == Some(zipcode),
                            zipcode.to_string(),
                        )
                        .clicked()
                    {
                        settings.selected_zipcode = Some(zipcode);
                    }
                }
            });
    });
    ui.add_space(8.0);

    // Filtering only; no re-aggregation happens on interaction.
    let filtered: Vec<&RecommendedHouse> = report
        .recommended
        .iter()
        .filter(|r| {
            settings
                .selected_zipcode
                .map_or(true, |z| r.house.zipcode == z)
        })
        .filter(|r| r.roi_pct.map_or(false, |roi| roi >= settings.min_roi))
        .collect();

    if filtered.is_empty() {
        no_data_label(ui, "No properties match the selected filters.");
        return;
    }

    egui::Grid::new("detail_table")
        .striped(true)
        .min_col_width(70.0)
        .spacing([10.0, 4.0])
        .show(ui, |ui| {
            for header in ["Index", "Price", "Regional Avg", "Zipcode", "ROI"] {
                ui.label(RichText::new(header).strong().size(11.0));
            }
            ui.end_row();

            for row in &filtered {
                ui.label(row.house.row_index.to_string());
                ui.label(format_money(row.house.price));
                ui.label(format_money(row.house.avg_price_region));
                ui.label(row.house.zipcode.to_string());
                ui.label(format_pct(row.roi_pct));
                ui.end_row();
            }
        });

    ui.add_space(10.0);
    let rois: Vec<f64> = filtered.iter().filter_map(|r| r.roi_pct).collect();
    let max = rois.iter().copied().fold(f64::NAN, f64::max);
    let mean = rois.iter().sum::<f64>() / rois.len().max(1) as f64;

    ui.horizontal(|ui| {
        metric(ui, "Highest ROI", &format!("{max:.1}%"));
        metric(ui, "Mean ROI", &format!("{mean:.1}%"));
        metric(ui, "Filtered Properties", &filtered.len().to_string());
    });
}

fn metric(ui: &mut egui::Ui, label: &str, value: &str) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(label).size(11.0).weak());
                ui.label(RichText::new(value).size(18.0).strong());
            });
        });
}
