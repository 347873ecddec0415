//! Text renderings of the view for front ends that do not draw widgets
//! themselves.

use std::fmt::Write;

use scenario_core::FieldName;

use crate::{ResultsPanel, ViewState};

/// Markup for the results container.
pub fn results_html(panel: &ResultsPanel) -> String {
    let mut html = String::from("<h3>Results:</h3>");
    for (label, value) in panel.rows() {
        let _ = write!(html, "<p><strong>{label}:</strong> {value}</p>");
    }
    html
}

/// Plain-text dump of the whole view, one item per line.
pub fn view_text(view: &ViewState) -> String {
    let mut out = String::new();
    for field in FieldName::ALL {
        let _ = writeln!(out, "{:<24}{}", format!("{}:", field.label()), view.form.get(field));
    }
    let _ = writeln!(out, "{:<24}{}", "Report email:", view.form.report_email);

    out.push_str("\nScenarios:\n");
    let selected = view.selector.selected_value();
    for option in view.selector.options() {
        let marker = if option.value == selected { '*' } else { ' ' };
        if option.value.is_empty() {
            let _ = writeln!(out, " {marker} {}", option.label);
        } else {
            let _ = writeln!(out, " {marker} [{}] {}", option.value, option.label);
        }
    }

    if let Some(panel) = &view.results {
        out.push_str("\nResults:\n");
        for (label, value) in panel.rows() {
            let _ = writeln!(out, "  {label}: {value}");
        }
    }
    if let Some(link) = &view.report_link {
        let _ = writeln!(out, "\nReport: {link}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::{ScenarioId, ScenarioResult, ScenarioSummary};

    fn panel() -> ResultsPanel {
        ResultsPanel::new(ScenarioResult {
            monthly_savings: 1234.5,
            payback_months: 3.333,
            roi_percentage: 56.789,
        })
    }

    #[test]
    fn results_markup_matches_panel_layout() {
        assert_eq!(
            results_html(&panel()),
            "<h3>Results:</h3>\
             <p><strong>Monthly Savings:</strong> $1234.50</p>\
             <p><strong>Payback (months):</strong> 3.33</p>\
             <p><strong>ROI (%):</strong> 56.79</p>"
        );
    }

    #[test]
    fn view_text_marks_selection_and_shows_results() {
        let mut view = ViewState::new();
        view.form.set(FieldName::ScenarioName, "Pilot");
        view.selector.replace(&[ScenarioSummary {
            id: ScenarioId::new("3"),
            scenario_name: "Pilot".into(),
        }]);
        view.selector.select_value("3");
        view.results = Some(panel());

        let text = view_text(&view);
        assert!(text.contains("Scenario name:          Pilot"));
        assert!(text.contains("   --Select Scenario--"));
        assert!(text.contains(" * [3] Pilot"));
        assert!(text.contains("  Monthly Savings: $1234.50"));
        assert!(!text.contains("Report:"));
    }
}
