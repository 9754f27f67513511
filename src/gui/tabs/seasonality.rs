//! Seasonality tab: monthly price cycle with best buy/sell month markers.

use crate::analysis::AnalysisReport;
use crate::gui::tabs::{format_money, no_data_label, BUY_COLOR, SELL_COLOR, MONTH_NAMES};
use crate::gui::UserSettings;
use egui::{ComboBox, RichText};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, VLine};

pub fn show(ui: &mut egui::Ui, settings: &mut UserSettings, report: &AnalysisReport) {
    ui.heading("📈 Seasonality Analysis");
    ui.separator();

    if report.years.is_empty() {
        no_data_label(ui, "The dataset contains no sale dates.");
        return;
    }

    let year = settings.selected_year.unwrap_or(report.years[0]);

    ui.horizontal(|ui| {
        ui.label("Year:");
        ComboBox::from_id_salt("season_year")
            .width(90.0)
            .selected_text(year.to_string())
            .show_ui(ui, |ui| {
                for &available in &report.years {
                    if ui
                        .selectable_label(year == available, available.to_string())
                        .clicked()
                    {
                        settings.selected_year = Some(available);
                    }
                }
            });
    });
    ui.add_space(8.0);

    let monthly = report
        .monthly_by_year
        .get(&year)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if monthly.is_empty() {
        no_data_label(ui, &format!("No sales recorded for {year}."));
        return;
    }

    // Max/min monthly mean mark the sell and buy windows.
    let best_sell = monthly
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let best_buy = monthly
        .iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let series: Vec<[f64; 2]> = monthly
        .iter()
        .map(|&(month, mean)| [month as f64, mean])
        .collect();

    Plot::new("seasonality")
        .height(320.0)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("Month")
        .y_axis_label("Mean Price (US$)")
        .include_x(1.0)
        .include_x(12.0)
        .x_axis_formatter(|mark, _range| {
            let idx = mark.value.round() as isize;
            if mark.value.fract().abs() < 0.01 && (1..=12).contains(&idx) {
                MONTH_NAMES[(idx - 1) as usize].to_string()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from_iter(series.iter().copied()))
                    .width(2.0)
                    .name(format!("Monthly mean {year}")),
            );
            plot_ui.points(Points::new(PlotPoints::from_iter(series.iter().copied())).radius(4.0));

            if let Some(&(month, _)) = best_sell {
                plot_ui.vline(
                    VLine::new(month as f64)
                        .color(SELL_COLOR)
                        .style(egui_plot::LineStyle::Dashed { length: 10.0 })
                        .name(format!("Best month to sell ({})", MONTH_NAMES[(month - 1) as usize])),
                );
            }
            if let Some(&(month, _)) = best_buy {
                plot_ui.vline(
                    VLine::new(month as f64)
                        .color(BUY_COLOR)
                        .style(egui_plot::LineStyle::Dashed { length: 10.0 })
                        .name(format!("Best month to buy ({})", MONTH_NAMES[(month - 1) as usize])),
                );
            }
        });

    if let (Some(&(sell_month, sell_mean)), Some(&(buy_month, buy_mean))) = (best_sell, best_buy) {
        ui.add_space(6.0);
        ui.label(
            RichText::new(format!(
                "Prices in {year} peak in {} ({}) and bottom out in {} ({}).",
                MONTH_NAMES[(sell_month - 1) as usize],
                format_money(sell_mean),
                MONTH_NAMES[(buy_month - 1) as usize],
                format_money(buy_mean),
            ))
            .size(12.0),
        );
    }
}
