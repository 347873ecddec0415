use async_trait::async_trait;

use crate::{
    ReportReceipt, ReportRequest, SaveAck, ScenarioId, ScenarioInput, ScenarioResult,
    ScenarioSummary,
};

/// Endpoint paths, relative to the API base.
pub mod paths {
    use crate::ScenarioId;

    pub const SIMULATE: &str = "/simulate";
    pub const SCENARIOS: &str = "/scenarios";
    pub const GENERATE_REPORT: &str = "/generate_report";

    pub fn scenario(id: &ScenarioId) -> String {
        format!("{SCENARIOS}/{id}")
    }
}

/// Transport to the ROI service. Concrete implementations live in
/// platform-specific crates (`reqwest` natively, `gloo-net` in the browser).
///
/// Futures are not required to be `Send` so browser fetch futures qualify.
#[async_trait(?Send)]
pub trait ScenarioApi {
    type Error: std::error::Error + 'static;

    /// `POST /simulate`.
    async fn simulate(&self, input: &ScenarioInput) -> Result<ScenarioResult, Self::Error>;

    /// `POST /scenarios`.
    async fn save_scenario(&self, input: &ScenarioInput) -> Result<SaveAck, Self::Error>;

    /// `GET /scenarios`.
    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, Self::Error>;

    /// `GET /scenarios/{id}`.
    async fn fetch_scenario(&self, id: &ScenarioId) -> Result<ScenarioInput, Self::Error>;

    /// `POST /generate_report`. A well-formed `{ok: false}` body is returned
    /// as `Ok`; callers decide how to surface it.
    async fn generate_report(&self, request: &ReportRequest)
        -> Result<ReportReceipt, Self::Error>;
}
