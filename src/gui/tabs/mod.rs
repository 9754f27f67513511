//! Tab views for the six dashboard sections.

pub mod buying;
pub mod insights;
pub mod map_view;
pub mod overview;
pub mod renovation;
pub mod seasonality;

use egui::{Color32, RichText};

/// Highlight color for the benchmark region 98001.
pub const BENCHMARK_COLOR: Color32 = Color32::from_rgb(255, 107, 107);
/// Default bar color for regional comparisons.
pub const REGION_COLOR: Color32 = Color32::from_rgb(78, 205, 196);
/// ROI scatter points.
pub const ROI_COLOR: Color32 = Color32::from_rgb(46, 204, 113);
/// Condition-impact bars.
pub const CONDITION_COLOR: Color32 = Color32::from_rgb(135, 206, 235);
/// Grade-impact bars.
pub const GRADE_COLOR: Color32 = Color32::from_rgb(250, 128, 114);
/// Best-month-to-sell marker.
pub const SELL_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
/// Best-month-to-buy marker.
pub const BUY_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `1234567.8` -> `"$1,234,568"`.
pub fn format_money(value: f64) -> String {
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Format an optional percentage, rendering `None` as "N/A".
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "N/A".to_string(),
    }
}

/// Explicit empty-result state instead of an empty chart.
pub fn no_data_label(ui: &mut egui::Ui, message: &str) {
    ui.add_space(20.0);
    ui.vertical_centered(|ui| {
        ui.label(
            RichText::new(format!("🛈 {message}"))
                .size(15.0)
                .color(Color32::GRAY),
        );
    });
    ui.add_space(20.0);
}

pub fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(10.0);
    ui.label(RichText::new(text).size(16.0).strong());
    ui.add_space(6.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_is_grouped_by_thousands() {
        assert_eq!(format_money(169100.0), "$169,100");
        assert_eq!(format_money(1_234_567.8), "$1,234,568");
        assert_eq!(format_money(950.0), "$950");
        assert_eq!(format_money(-25_000.0), "-$25,000");
    }

    #[test]
    fn missing_percentages_render_as_na() {
        assert_eq!(format_pct(Some(50.0)), "50.0%");
        assert_eq!(format_pct(None), "N/A");
    }
}
