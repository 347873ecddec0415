use scenario_core::{
    ReportReceipt, ReportRequest, SaveAck, ScenarioId, ScenarioInput, ScenarioResult,
    ScenarioSummary,
};

use crate::{ResultsPanel, ViewState, MISSING_EMAIL_MESSAGE};

/// User-triggered actions, one per button plus the startup refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Simulate,
    Save,
    Load,
    Refresh,
    RequestReport,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Simulate,
        Command::Save,
        Command::Load,
        Command::Refresh,
        Command::RequestReport,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Command::Simulate => "simulate",
            Command::Save => "save",
            Command::Load => "load",
            Command::Refresh => "refresh",
            Command::RequestReport => "report",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Command::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// A call to the ROI service.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Simulate(ScenarioInput),
    Save(ScenarioInput),
    Fetch(ScenarioId),
    List,
    Report(ReportRequest),
}

/// Decoded reply to a [`Request`].
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Simulated(ScenarioResult),
    Saved(SaveAck),
    Fetched(ScenarioInput),
    Listed(Vec<ScenarioSummary>),
    Reported(ReportReceipt),
}

/// What a command needs before anything touches the network.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    Send(Request),
    /// Abort and tell the user why.
    Notify(String),
    /// Abort silently.
    Skip,
}

/// Decide what `command` does given the current view. Pure.
pub fn plan(view: &ViewState, command: Command) -> Plan {
    match command {
        Command::Simulate => match view.form.read_input() {
            Ok(input) => Plan::Send(Request::Simulate(input)),
            Err(err) => Plan::Notify(err.to_string()),
        },
        Command::Save => match view.form.read_input() {
            Ok(input) => Plan::Send(Request::Save(input)),
            Err(err) => Plan::Notify(err.to_string()),
        },
        Command::Load => match view.selector.selected_id() {
            Some(id) => Plan::Send(Request::Fetch(id)),
            None => Plan::Skip,
        },
        Command::Refresh => Plan::Send(Request::List),
        Command::RequestReport => {
            let email = view.form.report_email.trim();
            if email.is_empty() {
                return Plan::Notify(MISSING_EMAIL_MESSAGE.to_string());
            }
            Plan::Send(Request::Report(ReportRequest {
                email: email.to_string(),
                scenario_id: view.selector.selected_id(),
                payload: view.form.read_input().ok(),
            }))
        }
    }
}

/// Fold a response into the view. Returns a follow-up request when the
/// response calls for one (a save refreshes the scenario list).
pub fn apply(view: &mut ViewState, response: Response) -> Option<Request> {
    match response {
        Response::Simulated(result) => {
            view.results = Some(ResultsPanel::new(result));
            None
        }
        Response::Saved(ack) => {
            view.notify(ack.message_or_default());
            Some(Request::List)
        }
        Response::Fetched(input) => {
            view.form.populate(&input);
            None
        }
        Response::Listed(scenarios) => {
            view.selector.replace(&scenarios);
            None
        }
        Response::Reported(receipt) => {
            if let Some(url) = receipt.report_url {
                view.notify(format!("Report ready: {url}"));
                view.report_link = Some(url);
            }
            None
        }
    }
}
