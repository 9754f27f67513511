//! Business Context tab: project background plus market-wide statistics.

use crate::analysis::AnalysisReport;
use crate::gui::tabs::{format_money, section_heading};
use egui::RichText;

pub fn show(ui: &mut egui::Ui, report: &AnalysisReport) {
    ui.heading("🏠 House Rocket - Business Context and Results");
    ui.separator();

    section_heading(ui, "📌 Business Context");
    ui.label(
        "House Rocket is a data-driven real-estate project built on historical \
         housing-sales records. The goal is to identify purchase opportunities, \
         determine the ideal moment to resell, and measure how renovations \
         affect resale value.",
    );
    ui.add_space(4.0);
    ui.label(
        "The analyzed sales run from May 2014 to May 2015 and cover prices, \
         location, property characteristics, and sales seasonality.",
    );

    section_heading(ui, "🎯 Business Questions");
    ui.label("• Which houses should be bought, and at what price?");
    ui.label("• When is the best moment to sell the acquired houses?");
    ui.label("• Should the company invest in renovations, and which upgrades raise resale value the most?");

    section_heading(ui, "📊 Market Summary");
    let market = &report.market;
    egui::Grid::new("market_summary")
        .striped(true)
        .min_col_width(140.0)
        .show(ui, |ui| {
            ui.label(RichText::new("Properties").strong());
            ui.label(market.count.to_string());
            ui.end_row();

            ui.label(RichText::new("Mean price").strong());
            ui.label(format_money(market.mean));
            ui.end_row();

            ui.label(RichText::new("Median price").strong());
            ui.label(format_money(market.median));
            ui.end_row();

            ui.label(RichText::new("Std deviation").strong());
            ui.label(format_money(market.std));
            ui.end_row();

            ui.label(RichText::new("Cheapest sale").strong());
            ui.label(format_money(market.min));
            ui.end_row();

            ui.label(RichText::new("Most expensive sale").strong());
            ui.label(format_money(market.max));
            ui.end_row();
        });
}
