use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use scenario_core::{
    paths, ReportReceipt, ReportRequest, SaveAck, ScenarioApi, ScenarioId, ScenarioInput,
    ScenarioResult, ScenarioSummary,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{endpoint, FetchError};

/// `fetch`-backed transport for the page.
#[derive(Debug, Clone, Default)]
pub struct FetchApi {
    base: String,
}

impl FetchApi {
    /// `base` may be empty to call the page's own origin.
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let resp = Request::get(&endpoint(&self.base, path))
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        decode_ok(path, resp).await
    }

    async fn post_raw<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, FetchError> {
        let json = serde_json::to_string(body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Request::post(&endpoint(&self.base, path))
            .header("Content-Type", "application/json")
            .body(json)
            .map_err(|e| FetchError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        let resp = self.post_raw(path, body).await?;
        decode_ok(path, resp).await
    }
}

async fn decode_ok<T: DeserializeOwned>(path: &str, resp: Response) -> Result<T, FetchError> {
    if !resp.ok() {
        return Err(FetchError::Status {
            path: path.to_string(),
            status: resp.status(),
        });
    }
    resp.json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

#[async_trait(?Send)]
impl ScenarioApi for FetchApi {
    type Error = FetchError;

    async fn simulate(&self, input: &ScenarioInput) -> Result<ScenarioResult, FetchError> {
        self.post_json(paths::SIMULATE, input).await
    }

    async fn save_scenario(&self, input: &ScenarioInput) -> Result<SaveAck, FetchError> {
        self.post_json(paths::SCENARIOS, input).await
    }

    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, FetchError> {
        self.get_json(paths::SCENARIOS).await
    }

    async fn fetch_scenario(&self, id: &ScenarioId) -> Result<ScenarioInput, FetchError> {
        self.get_json(&paths::scenario(id)).await
    }

    async fn generate_report(&self, request: &ReportRequest) -> Result<ReportReceipt, FetchError> {
        let resp = self.post_raw(paths::GENERATE_REPORT, request).await?;
        let ok = resp.ok();
        let status = resp.status();
        // 4xx rejections still carry an `{ok: false, error}` body.
        match resp.json::<ReportReceipt>().await {
            Ok(receipt) if ok || !receipt.ok => Ok(receipt),
            Ok(_) => Err(FetchError::Status {
                path: paths::GENERATE_REPORT.to_string(),
                status,
            }),
            Err(_) if !ok => Err(FetchError::Status {
                path: paths::GENERATE_REPORT.to_string(),
                status,
            }),
            Err(e) => Err(FetchError::Decode(e.to_string())),
        }
    }
}
