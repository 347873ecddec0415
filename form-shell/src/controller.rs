use std::cell::RefCell;

use scenario_core::ScenarioApi;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::command::{apply, plan, Command, Plan, Request, Response};
use crate::ViewState;

#[derive(Debug, Error)]
pub enum DispatchError<E>
where
    E: std::error::Error + 'static,
{
    #[error("transport error: {0}")]
    Transport(#[source] E),
    #[error("report rejected: {0}")]
    Rejected(String),
}

/// How a dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// All requests went out and their responses were applied.
    Completed { requests: usize },
    /// Aborted locally with a notification.
    Notified,
    /// Aborted silently.
    Skipped,
}

/// Perform one request against the service.
pub async fn execute<A: ScenarioApi>(
    api: &A,
    request: &Request,
) -> Result<Response, DispatchError<A::Error>> {
    let response = match request {
        Request::Simulate(input) => {
            Response::Simulated(api.simulate(input).await.map_err(DispatchError::Transport)?)
        }
        Request::Save(input) => {
            Response::Saved(api.save_scenario(input).await.map_err(DispatchError::Transport)?)
        }
        Request::Fetch(id) => {
            Response::Fetched(api.fetch_scenario(id).await.map_err(DispatchError::Transport)?)
        }
        Request::List => {
            Response::Listed(api.list_scenarios().await.map_err(DispatchError::Transport)?)
        }
        Request::Report(report) => {
            let receipt = api
                .generate_report(report)
                .await
                .map_err(DispatchError::Transport)?;
            if !receipt.ok {
                let reason = receipt
                    .error
                    .unwrap_or_else(|| "report generation failed".to_string());
                return Err(DispatchError::Rejected(reason));
            }
            Response::Reported(receipt)
        }
    };
    Ok(response)
}

/// Runs commands against a shared [`ViewState`].
///
/// The view is only borrowed between awaits, so several dispatches may be in
/// flight at once; whichever response lands last wins its region of the view.
pub struct Controller<A> {
    api: A,
}

impl<A: ScenarioApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Plan, send, apply, and follow any chained request. On error the
    /// view keeps whatever had been applied before the failing request.
    pub async fn dispatch(
        &self,
        view: &RefCell<ViewState>,
        command: Command,
    ) -> Result<Dispatched, DispatchError<A::Error>> {
        let planned = plan(&view.borrow(), command);
        let mut request = match planned {
            Plan::Send(request) => request,
            Plan::Notify(message) => {
                debug!(command = command.name(), %message, "command aborted");
                view.borrow_mut().notify(message);
                return Ok(Dispatched::Notified);
            }
            Plan::Skip => {
                debug!(command = command.name(), "command skipped");
                return Ok(Dispatched::Skipped);
            }
        };

        if let Request::Simulate(input) | Request::Save(input) = &request {
            for (field, issue) in input.issues() {
                warn!(%field, %issue, "numeric field sent as null");
            }
        }

        let mut requests = 0;
        loop {
            requests += 1;
            let response = execute(&self.api, &request).await?;
            match apply(&mut view.borrow_mut(), response) {
                Some(next) => request = next,
                None => break,
            }
        }
        info!(command = command.name(), requests, "command completed");
        Ok(Dispatched::Completed { requests })
    }
}
