//! Insights tab: findings and recommendations from the analysis.

use crate::gui::tabs::section_heading;

pub fn show(ui: &mut egui::Ui) {
    ui.heading("📊 Insights and Recommendations");
    ui.separator();

    section_heading(ui, "General Insight");
    ui.label(
        "Focus acquisitions on houses that combine good construction grade and \
         condition with prices below their regional average. The recommended \
         houses in zipcode 98001 sell below the regional mean, offering solid \
         appreciation margins. They are consistent in profile, mostly 3 or 4 \
         bedrooms with at least 2 bathrooms, which matches strong family demand.",
    );

    section_heading(ui, "Appreciation and Renovation");
    ui.label(
        "Grade upgrades move prices far more than condition upgrades. Quality \
         renovations can raise values substantially, especially for low-grade \
         houses: lifting a grade-5 house to grade 6 adds around $219,000 on \
         average.",
    );

    section_heading(ui, "Best Moment to Buy and Sell");
    ui.label(
        "The seasonal analysis shows mean prices peaking in April, the best \
         month to sell, while December through February offers the best buying \
         window. That gap is the strategic window for maximizing resale profit.",
    );

    section_heading(ui, "Conclusions");
    ui.label("• Houses below the regional average, like those in zipcode 98001, offer a good profit margin.");
    ui.label("• Grade-focused renovations are the most profitable and should be prioritized.");
    ui.label("• Selling in April captures the seasonal peak of the housing market.");
}
