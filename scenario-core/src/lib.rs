use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

mod api;

pub use api::{paths, ScenarioApi};

/// Confirmation shown after a save when the server sends no message.
pub const DEFAULT_SAVE_MESSAGE: &str = "Scenario saved!";

/// Keys of the scenario form. The same strings are used as JSON keys and
/// as element ids in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldName {
    ScenarioName,
    MonthlyInvoiceVolume,
    NumApStaff,
    AvgHoursPerInvoice,
    HourlyWage,
    ErrorRateManual,
    ErrorCost,
    TimeHorizonMonths,
    OneTimeImplementationCost,
}

impl FieldName {
    /// Every form field, in form order.
    pub const ALL: [FieldName; 9] = [
        FieldName::ScenarioName,
        FieldName::MonthlyInvoiceVolume,
        FieldName::NumApStaff,
        FieldName::AvgHoursPerInvoice,
        FieldName::HourlyWage,
        FieldName::ErrorRateManual,
        FieldName::ErrorCost,
        FieldName::TimeHorizonMonths,
        FieldName::OneTimeImplementationCost,
    ];

    /// Numeric fields that are sent as-is (no zero default).
    pub const MEASURES: [FieldName; 7] = [
        FieldName::MonthlyInvoiceVolume,
        FieldName::NumApStaff,
        FieldName::AvgHoursPerInvoice,
        FieldName::HourlyWage,
        FieldName::ErrorRateManual,
        FieldName::ErrorCost,
        FieldName::TimeHorizonMonths,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::ScenarioName => "scenario_name",
            FieldName::MonthlyInvoiceVolume => "monthly_invoice_volume",
            FieldName::NumApStaff => "num_ap_staff",
            FieldName::AvgHoursPerInvoice => "avg_hours_per_invoice",
            FieldName::HourlyWage => "hourly_wage",
            FieldName::ErrorRateManual => "error_rate_manual",
            FieldName::ErrorCost => "error_cost",
            FieldName::TimeHorizonMonths => "time_horizon_months",
            FieldName::OneTimeImplementationCost => "one_time_implementation_cost",
        }
    }

    /// Human-readable label (used by text front ends).
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::ScenarioName => "Scenario name",
            FieldName::MonthlyInvoiceVolume => "Monthly invoice volume",
            FieldName::NumApStaff => "AP staff",
            FieldName::AvgHoursPerInvoice => "Hours per invoice",
            FieldName::HourlyWage => "Hourly wage",
            FieldName::ErrorRateManual => "Manual error rate",
            FieldName::ErrorCost => "Cost per error",
            FieldName::TimeHorizonMonths => "Time horizon (months)",
            FieldName::OneTimeImplementationCost => "Implementation cost",
        }
    }

    /// Inverse of [`FieldName::as_str`].
    pub fn from_name(s: &str) -> Option<Self> {
        FieldName::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::from_name(s).ok_or_else(|| format!("unknown field: {s}"))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a numeric field did not produce a usable number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseIssue {
    /// Input text was empty or whitespace.
    Empty,
    /// Input text was not a number.
    Malformed(String),
    /// Parsed to infinity or NaN, which JSON cannot carry.
    NonFinite,
    /// Absent or `null` in a server payload.
    Missing,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseIssue::Empty => f.write_str("empty"),
            ParseIssue::Malformed(text) => write!(f, "not a number: {text:?}"),
            ParseIssue::NonFinite => f.write_str("not finite"),
            ParseIssue::Missing => f.write_str("missing"),
        }
    }
}

/// Parse result for a numeric form field.
///
/// `Invalid` serializes as JSON `null`, which is what the server receives
/// for a field the user left blank or mistyped.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Value(f64),
    Invalid(ParseIssue),
}

impl Numeric {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Numeric::Invalid(ParseIssue::Empty);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Numeric::Value(v),
            Ok(_) => Numeric::Invalid(ParseIssue::NonFinite),
            Err(_) => Numeric::Invalid(ParseIssue::Malformed(trimmed.to_string())),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Numeric::Value(v) => Some(*v),
            Numeric::Invalid(_) => None,
        }
    }

    pub fn issue(&self) -> Option<&ParseIssue> {
        match self {
            Numeric::Value(_) => None,
            Numeric::Invalid(issue) => Some(issue),
        }
    }

    /// Text to put back into an input element.
    pub fn to_field_text(&self) -> String {
        match self {
            Numeric::Value(v) => format_plain(*v),
            Numeric::Invalid(_) => String::new(),
        }
    }
}

impl Default for Numeric {
    fn default() -> Self {
        Numeric::Invalid(ParseIssue::Missing)
    }
}

impl From<f64> for Numeric {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Numeric::Value(v)
        } else {
            Numeric::Invalid(ParseIssue::NonFinite)
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Numeric::Value(v) => serializer.serialize_f64(*v),
            Numeric::Invalid(_) => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Numeric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(raw.map(Numeric::from).unwrap_or_default())
    }
}

/// Opaque scenario identifier. Servers send either a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ScenarioId(String);

impl ScenarioId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ScenarioId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            UInt(u64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => ScenarioId(n.to_string()),
            RawId::UInt(n) => ScenarioId(n.to_string()),
            RawId::Float(n) => ScenarioId(format_plain(n)),
            RawId::Text(s) => ScenarioId(s),
        })
    }
}

/// Inputs for one simulation; the request body of `/simulate` and
/// `/scenarios`, and the response body of `/scenarios/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub scenario_name: String,
    #[serde(default)]
    pub monthly_invoice_volume: Numeric,
    #[serde(default)]
    pub num_ap_staff: Numeric,
    #[serde(default)]
    pub avg_hours_per_invoice: Numeric,
    #[serde(default)]
    pub hourly_wage: Numeric,
    #[serde(default)]
    pub error_rate_manual: Numeric,
    #[serde(default)]
    pub error_cost: Numeric,
    #[serde(default)]
    pub time_horizon_months: Numeric,
    #[serde(default, deserialize_with = "zero_when_absent")]
    pub one_time_implementation_cost: f64,
}

impl ScenarioInput {
    pub fn measure(&self, field: FieldName) -> Option<&Numeric> {
        match field {
            FieldName::MonthlyInvoiceVolume => Some(&self.monthly_invoice_volume),
            FieldName::NumApStaff => Some(&self.num_ap_staff),
            FieldName::AvgHoursPerInvoice => Some(&self.avg_hours_per_invoice),
            FieldName::HourlyWage => Some(&self.hourly_wage),
            FieldName::ErrorRateManual => Some(&self.error_rate_manual),
            FieldName::ErrorCost => Some(&self.error_cost),
            FieldName::TimeHorizonMonths => Some(&self.time_horizon_months),
            FieldName::ScenarioName | FieldName::OneTimeImplementationCost => None,
        }
    }

    /// Fields whose text did not parse, in form order.
    pub fn issues(&self) -> Vec<(FieldName, &ParseIssue)> {
        FieldName::MEASURES
            .into_iter()
            .filter_map(|f| {
                self.measure(f)
                    .and_then(Numeric::issue)
                    .map(|issue| (f, issue))
            })
            .collect()
    }

    /// Text form of a field, as it should appear in the form when this
    /// scenario is loaded.
    pub fn field_text(&self, field: FieldName) -> String {
        match field {
            FieldName::ScenarioName => self.scenario_name.clone(),
            FieldName::OneTimeImplementationCost => format_plain(self.one_time_implementation_cost),
            measure => self
                .measure(measure)
                .map(Numeric::to_field_text)
                .unwrap_or_default(),
        }
    }
}

fn zero_when_absent<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Metrics computed by the server for a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub monthly_savings: f64,
    pub payback_months: f64,
    pub roi_percentage: f64,
}

/// Entry of the saved-scenario list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: ScenarioId,
    pub scenario_name: String,
}

/// Response body of a save.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveAck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SaveAck {
    /// Server message, or the default confirmation when it is absent or empty.
    pub fn message_or_default(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_SAVE_MESSAGE)
    }
}

/// Body of `/generate_report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_id: Option<ScenarioId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<ScenarioInput>,
}

/// Response of `/generate_report`, on both success and failure statuses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportReceipt {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Fixed two-decimal rendering used by the results panel.
pub fn format_fixed2(v: f64) -> String {
    format!("{v:.2}")
}

/// Shortest plain rendering of a number (`5`, `1234.5`, `0.02`).
pub fn format_plain(v: f64) -> String {
    format!("{v}")
}
