//! Command-line use cases.

mod assess;
mod health;
mod materials;
mod normalize;

use std::fmt::Write;

pub use assess::{assess, parse_emission};
pub use health::health;
pub use materials::materials;
pub use normalize::normalize_file;

use crate::report::{AssessmentReport, ImpactMetrics};

/// Plain-text summary of a report.
pub fn render_report(report: &AssessmentReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Assessment {} ({} ms)",
        report.request_id, report.processing_time
    );

    if report.stages.is_empty() {
        let _ = writeln!(out, "\nNo lifecycle stages returned.");
    }

    for (i, stage) in report.stages.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, stage.stage);
        let _ = writeln!(out, "   {}", render_metrics(&stage.impact));
        let _ = writeln!(out, "   Main cause: {}", stage.main_cause);
        render_list(&mut out, "Alternative methods", &stage.alternative_methods);
        render_list(&mut out, "Reduction suggestions", &stage.reduction_suggestions);
        render_list(
            &mut out,
            "Circularity opportunities",
            &stage.circularity_opportunities,
        );
    }

    let _ = writeln!(out, "\nTotal impact");
    let _ = writeln!(out, "   {}", render_metrics(&report.total_impact));
    out
}

fn render_metrics(m: &ImpactMetrics) -> String {
    format!(
        "Carbon: {:.2}  Water: {:.2}  Energy: {:.2}  Waste: {:.2}",
        m.carbon, m.water, m.energy, m.waste
    )
}

fn render_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "   {}:", title);
    for item in items {
        let _ = writeln!(out, "     - {}", item);
    }
}
