//! Renovation Impact tab: condition/grade price impact, upgrade increments,
//! and the fixed post-renovation uplift snapshot.

use crate::analysis::AnalysisReport;
use crate::gui::tabs::{
    format_money, format_pct, no_data_label, section_heading, CONDITION_COLOR, GRADE_COLOR,
};
use egui::RichText;
use egui_plot::{Bar, BarChart, Legend, Plot};

const TABLE_ROW_HEIGHT: f32 = 18.0;

pub fn show(ui: &mut egui::Ui, report: &AnalysisReport) {
    ui.heading("🛠 Renovation Impact Analysis");
    ui.separator();

    section_heading(ui, "🏠 Houses with Renovation Potential");
    candidates_table(ui, report);

    section_heading(ui, "📊 Price Impact of Condition and Grade");
    ui.columns(2, |columns| {
        impact_chart(
            &mut columns[0],
            "condition_impact",
            "Condition",
            &report.condition_impact,
            CONDITION_COLOR,
        );
        impact_chart(
            &mut columns[1],
            "grade_impact",
            "Grade",
            &report.grade_impact,
            GRADE_COLOR,
        );
    });

    section_heading(ui, "📈 Price Increment from Condition and Grade Upgrades");
    increments_chart(ui, report);

    section_heading(ui, "📊 Post-Renovation Value Uplift");
    uplift_chart(ui, report);
    uplift_table(ui, report);
}

/// Virtualized table: the candidate list covers the whole dataset.
fn candidates_table(ui: &mut egui::Ui, report: &AnalysisReport) {
    let rows = &report.renovation_candidates;
    if rows.is_empty() {
        no_data_label(ui, "No renovation candidates in this dataset.");
        return;
    }

    ui.horizontal(|ui| {
        for (width, header) in [
            (70.0, "Index"),
            (110.0, "Price"),
            (130.0, "Condition Mean"),
            (80.0, "Condition"),
            (60.0, "Grade"),
        ] {
            ui.add_sized(
                [width, TABLE_ROW_HEIGHT],
                egui::Label::new(RichText::new(header).strong().size(11.0)),
            );
        }
    });

    egui::ScrollArea::vertical()
        .id_salt("renovation_candidates")
        .max_height(260.0)
        .auto_shrink([false, true])
        .show_rows(ui, TABLE_ROW_HEIGHT, rows.len(), |ui, row_range| {
            for row in &rows[row_range] {
                ui.horizontal(|ui| {
                    for (width, value) in [
                        (70.0, row.row_index.to_string()),
                        (110.0, format_money(row.price)),
                        (130.0, format_money(row.condition_mean)),
                        (80.0, row.condition.to_string()),
                        (60.0, row.grade.to_string()),
                    ] {
                        ui.add_sized(
                            [width, TABLE_ROW_HEIGHT],
                            egui::Label::new(RichText::new(value).size(11.0)),
                        );
                    }
                });
            }
        });
}

fn impact_chart(
    ui: &mut egui::Ui,
    id: &str,
    axis: &str,
    impact: &[(i64, f64)],
    color: egui::Color32,
) {
    ui.label(RichText::new(format!("Mean price by {axis}")).strong());
    if impact.is_empty() {
        no_data_label(ui, "No data.");
        return;
    }

    let bars: Vec<Bar> = impact
        .iter()
        .map(|&(score, mean)| Bar::new(score as f64, mean).width(0.6).fill(color))
        .collect();

    Plot::new(id.to_string())
        .height(240.0)
        .allow_scroll(false)
        .x_axis_label(axis.to_string())
        .y_axis_label("Mean Price (US$)")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(axis.to_string()));
        });
}

fn increments_chart(ui: &mut egui::Ui, report: &AnalysisReport) {
    let top = &report.top_increments;
    if top.is_empty() {
        no_data_label(ui, "No increment data.");
        return;
    }

    let labels: Vec<String> = top.iter().map(|inc| inc.condition.to_string()).collect();
    let condition_bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, inc)| {
            Bar::new(i as f64 - 0.2, inc.increment_condition)
                .width(0.35)
                .fill(CONDITION_COLOR)
        })
        .collect();
    let grade_bars: Vec<Bar> = top
        .iter()
        .enumerate()
        .map(|(i, inc)| {
            Bar::new(i as f64 + 0.2, inc.increment_grade)
                .width(0.35)
                .fill(GRADE_COLOR)
        })
        .collect();

    Plot::new("increments")
        .height(280.0)
        .allow_scroll(false)
        .legend(Legend::default())
        .x_axis_label("Condition")
        .y_axis_label("Price Increment (US$)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if mark.value.fract().abs() < 0.01 && idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(condition_bars).name("Condition upgrade"));
            plot_ui.bar_chart(BarChart::new(grade_bars).name("Grade upgrade"));
        });
    ui.label(
        RichText::new(
            "Increments can be negative when a house already sells above its group mean.",
        )
        .size(11.0)
        .weak(),
    );
}

fn uplift_chart(ui: &mut egui::Ui, report: &AnalysisReport) {
    let labels: Vec<String> = report
        .renovation_uplifts
        .iter()
        .map(|u| u.snapshot.row_index.to_string())
        .collect();
    let bars: Vec<Bar> = report
        .renovation_uplifts
        .iter()
        .enumerate()
        .filter_map(|(i, u)| {
            u.uplift_pct
                .map(|pct| Bar::new(i as f64, pct).width(0.6).fill(GRADE_COLOR))
        })
        .collect();
    if bars.is_empty() {
        no_data_label(ui, "No uplift data.");
        return;
    }

    Plot::new("uplift")
        .height(260.0)
        .allow_scroll(false)
        .x_axis_label("House (Index)")
        .y_axis_label("Value Uplift (%)")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round() as usize;
            if mark.value.fract().abs() < 0.01 && idx < labels.len() {
                labels[idx].clone()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Post-renovation uplift"));
        });
}

fn uplift_table(ui: &mut egui::Ui, report: &AnalysisReport) {
    ui.add_space(8.0);
    egui::Grid::new("uplift_table")
        .striped(true)
        .min_col_width(90.0)
        .spacing([10.0, 4.0])
        .show(ui, |ui| {
            for header in [
                "Index",
                "Price",
                "Post-Renovation",
                "Condition Increment",
                "Grade Increment",
                "Uplift",
            ] {
                ui.label(RichText::new(header).strong().size(11.0));
            }
            ui.end_row();

            for row in &report.renovation_uplifts {
                let s = &row.snapshot;
                ui.label(s.row_index.to_string());
                ui.label(format_money(s.price));
                ui.label(format_money(s.post_renovation_price));
                ui.label(format_money(s.increment_condition));
                ui.label(format_money(s.increment_grade));
                ui.label(format_pct(row.uplift_pct));
                ui.end_row();
            }
        });
}
