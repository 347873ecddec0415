//! View state and command handling for the ROI scenario form.
//!
//! Front ends own the widgets; this crate owns what they show. Every button
//! maps to a [`Command`], [`plan`] turns it into either a local notification
//! or an API [`Request`], and [`apply`] folds the server's [`Response`] back
//! into [`ViewState`]. [`Controller`] runs that loop against a
//! [`ScenarioApi`](scenario_core::ScenarioApi).

use std::collections::BTreeMap;

use scenario_core::{
    format_fixed2, FieldName, Numeric, ScenarioId, ScenarioInput, ScenarioResult,
    ScenarioSummary,
};
use thiserror::Error;

mod command;
mod controller;
pub mod render;

pub use command::{apply, plan, Command, Plan, Request, Response};
pub use controller::{execute, Controller, DispatchError, Dispatched};

/// Label of the "no selection" entry at the top of the scenario selector.
pub const PLACEHOLDER_LABEL: &str = "--Select Scenario--";
pub const MISSING_NAME_MESSAGE: &str = "Please enter a scenario name.";
pub const MISSING_EMAIL_MESSAGE: &str = "Please enter an email address.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{}", MISSING_NAME_MESSAGE)]
    MissingName,
}

/// Raw text of every form input, as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    fields: BTreeMap<FieldName, String>,
    pub report_email: String,
}

impl FormState {
    pub fn get(&self, field: FieldName) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        self.fields.insert(field, value.into());
    }

    /// Collect the inputs for a request. Only the scenario name is required;
    /// numeric fields keep their parse result, and an unusable
    /// implementation cost becomes 0.
    pub fn read_input(&self) -> Result<ScenarioInput, FormError> {
        let scenario_name = self.get(FieldName::ScenarioName).trim();
        if scenario_name.is_empty() {
            return Err(FormError::MissingName);
        }
        let num = |field| Numeric::parse(self.get(field));
        Ok(ScenarioInput {
            scenario_name: scenario_name.to_string(),
            monthly_invoice_volume: num(FieldName::MonthlyInvoiceVolume),
            num_ap_staff: num(FieldName::NumApStaff),
            avg_hours_per_invoice: num(FieldName::AvgHoursPerInvoice),
            hourly_wage: num(FieldName::HourlyWage),
            error_rate_manual: num(FieldName::ErrorRateManual),
            error_cost: num(FieldName::ErrorCost),
            time_horizon_months: num(FieldName::TimeHorizonMonths),
            one_time_implementation_cost: num(FieldName::OneTimeImplementationCost)
                .value()
                .unwrap_or(0.0),
        })
    }

    /// Overwrite every scenario field from a loaded scenario.
    pub fn populate(&mut self, input: &ScenarioInput) {
        for field in FieldName::ALL {
            self.set(field, input.field_text(field));
        }
    }
}

/// Rendered simulation metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultsPanel {
    pub result: ScenarioResult,
}

impl ResultsPanel {
    pub fn new(result: ScenarioResult) -> Self {
        Self { result }
    }

    /// `(label, value)` rows in display order.
    pub fn rows(&self) -> [(&'static str, String); 3] {
        [
            (
                "Monthly Savings",
                format!("${}", format_fixed2(self.result.monthly_savings)),
            ),
            ("Payback (months)", format_fixed2(self.result.payback_months)),
            ("ROI (%)", format_fixed2(self.result.roi_percentage)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn placeholder() -> Self {
        Self {
            value: String::new(),
            label: PLACEHOLDER_LABEL.to_string(),
        }
    }
}

/// Saved-scenario dropdown. The first option is always the placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSelector {
    options: Vec<SelectOption>,
    selected: usize,
}

impl Default for ScenarioSelector {
    fn default() -> Self {
        Self {
            options: vec![SelectOption::placeholder()],
            selected: 0,
        }
    }
}

impl ScenarioSelector {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Rebuild from a server list; the selection falls back to the placeholder.
    pub fn replace(&mut self, scenarios: &[ScenarioSummary]) {
        self.options.clear();
        self.options.push(SelectOption::placeholder());
        self.options
            .extend(scenarios.iter().map(|s| SelectOption {
                value: s.id.to_string(),
                label: s.scenario_name.clone(),
            }));
        self.selected = 0;
    }

    /// Select the option with this value. Unknown values leave the selection
    /// unchanged and return false.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    pub fn selected_value(&self) -> &str {
        &self.options[self.selected].value
    }

    /// Selected scenario, or `None` while the placeholder is selected.
    pub fn selected_id(&self) -> Option<ScenarioId> {
        let value = self.selected_value();
        (!value.is_empty()).then(|| ScenarioId::new(value))
    }
}

/// Everything a front end displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub form: FormState,
    pub results: Option<ResultsPanel>,
    pub selector: ScenarioSelector,
    pub report_link: Option<String>,
    notifications: Vec<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a blocking message for the user.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push(message.into());
    }

    pub fn pending_notifications(&self) -> &[String] {
        &self.notifications
    }

    /// Drain queued messages in the order they were raised.
    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_core::ParseIssue;

    fn filled_form() -> FormState {
        let mut form = FormState::default();
        form.set(FieldName::ScenarioName, "  Pilot  ");
        form.set(FieldName::MonthlyInvoiceVolume, "2000");
        form.set(FieldName::NumApStaff, "3");
        form.set(FieldName::AvgHoursPerInvoice, "0.17");
        form.set(FieldName::HourlyWage, "30");
        form.set(FieldName::ErrorRateManual, "0.5");
        form.set(FieldName::ErrorCost, "100");
        form.set(FieldName::TimeHorizonMonths, "36");
        form.set(FieldName::OneTimeImplementationCost, "50000");
        form
    }

    #[test]
    fn read_input_trims_name_and_parses_numbers() {
        let input = filled_form().read_input().unwrap();
        assert_eq!(input.scenario_name, "Pilot");
        assert_eq!(input.avg_hours_per_invoice, Numeric::Value(0.17));
        assert_eq!(input.one_time_implementation_cost, 50000.0);
        assert!(input.issues().is_empty());
    }

    #[test]
    fn whitespace_name_is_rejected() {
        let mut form = filled_form();
        form.set(FieldName::ScenarioName, " \t ");
        assert_eq!(form.read_input(), Err(FormError::MissingName));
        assert_eq!(FormError::MissingName.to_string(), MISSING_NAME_MESSAGE);
    }

    #[test]
    fn bad_numbers_are_kept_as_parse_results() {
        let mut form = filled_form();
        form.set(FieldName::HourlyWage, "");
        form.set(FieldName::ErrorCost, "ten");
        form.set(FieldName::OneTimeImplementationCost, "soon");
        let input = form.read_input().unwrap();
        assert_eq!(input.hourly_wage, Numeric::Invalid(ParseIssue::Empty));
        assert_eq!(
            input.error_cost,
            Numeric::Invalid(ParseIssue::Malformed("ten".into()))
        );
        assert_eq!(input.one_time_implementation_cost, 0.0);
    }

    #[test]
    fn populate_overwrites_every_field() {
        let mut form = filled_form();
        let mut other = FormState::default();
        other.set(FieldName::ScenarioName, "Other");
        other.set(FieldName::MonthlyInvoiceVolume, "10");
        let loaded = other.read_input().unwrap();
        form.populate(&loaded);
        assert_eq!(form.get(FieldName::ScenarioName), "Other");
        assert_eq!(form.get(FieldName::MonthlyInvoiceVolume), "10");
        assert_eq!(form.get(FieldName::HourlyWage), "");
        assert_eq!(form.get(FieldName::OneTimeImplementationCost), "0");
    }

    #[test]
    fn selector_lists_placeholder_then_server_order() {
        let mut selector = ScenarioSelector::default();
        selector.replace(&[
            ScenarioSummary {
                id: ScenarioId::new("1"),
                scenario_name: "A".into(),
            },
            ScenarioSummary {
                id: ScenarioId::new("2"),
                scenario_name: "B".into(),
            },
        ]);
        let labels: Vec<&str> = selector.options().iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, [PLACEHOLDER_LABEL, "A", "B"]);
        assert_eq!(selector.selected_id(), None);

        assert!(selector.select_value("2"));
        assert_eq!(selector.selected_id(), Some(ScenarioId::new("2")));
        assert!(!selector.select_value("7"));
        assert_eq!(selector.selected_value(), "2");

        selector.replace(&[]);
        assert_eq!(selector.options().len(), 1);
        assert_eq!(selector.selected_id(), None);
    }

    #[test]
    fn results_rows_use_two_decimals() {
        let panel = ResultsPanel::new(ScenarioResult {
            monthly_savings: 1234.5,
            payback_months: 3.333,
            roi_percentage: 56.789,
        });
        let rows = panel.rows();
        assert_eq!(rows[0], ("Monthly Savings", "$1234.50".to_string()));
        assert_eq!(rows[1].1, "3.33");
        assert_eq!(rows[2].1, "56.79");
    }

    #[test]
    fn notifications_drain_in_order() {
        let mut view = ViewState::new();
        view.notify("one");
        view.notify("two");
        assert_eq!(view.pending_notifications().len(), 2);
        assert_eq!(view.take_notifications(), ["one", "two"]);
        assert!(view.pending_notifications().is_empty());
    }
}
