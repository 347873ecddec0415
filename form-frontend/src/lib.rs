//! Browser binding for the ROI scenario form.
//!
//! Wires the page's buttons to [`form_shell::Command`]s, copies input
//! values into the shared view before each command, and writes the view
//! back into the document when the command settles.

use form_shell::{Command, Dispatched};
use scenario_core::FieldName;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod transport;

#[cfg(target_arch = "wasm32")]
pub use dom::{start, FormApp};
#[cfg(target_arch = "wasm32")]
pub use transport::FetchApi;

pub const SELECT_ID: &str = "scenarioSelect";
pub const RESULTS_ID: &str = "results";
pub const REPORT_EMAIL_ID: &str = "report_email";

/// Button element ids and the command each one triggers. Missing buttons
/// are not wired.
pub const BUTTONS: [(&str, Command); 4] = [
    ("simulateBtn", Command::Simulate),
    ("saveBtn", Command::Save),
    ("loadBtn", Command::Load),
    ("reportBtn", Command::RequestReport),
];

/// Input element id for a form field.
pub fn input_id(field: FieldName) -> &'static str {
    field.as_str()
}

/// Request URL for `path`. An empty base yields a same-origin relative path.
pub fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim().trim_end_matches('/'), path)
}

/// Page regions a finished command may overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Regions {
    pub form: bool,
    pub selector: bool,
    pub results: bool,
}

/// Regions `command` owns, given how its dispatch ended (`None` on error).
/// Aborted, skipped and failed commands leave the page alone so that edits
/// made while a request was in flight survive.
pub fn regions_written(command: Command, outcome: Option<Dispatched>) -> Regions {
    let Some(Dispatched::Completed { .. }) = outcome else {
        return Regions::default();
    };
    match command {
        Command::Simulate => Regions {
            results: true,
            ..Regions::default()
        },
        Command::Save | Command::Refresh => Regions {
            selector: true,
            ..Regions::default()
        },
        Command::Load => Regions {
            form: true,
            ..Regions::default()
        },
        Command::RequestReport => Regions::default(),
    }
}

/// Failure of a browser fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("decode error: {0}")]
    Decode(String),
}
