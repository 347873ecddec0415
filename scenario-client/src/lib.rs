use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use scenario_core::{
    paths, ReportReceipt, ReportRequest, SaveAck, ScenarioApi, ScenarioId, ScenarioInput,
    ScenarioResult, ScenarioSummary,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Service address used when neither a flag nor the environment names one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_USER_AGENT: &str = "roi-scenario-client/0.1";

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "ROI_API_BASE";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("{method} {path} returned {status}")]
    Status {
        method: &'static str,
        path: String,
        status: StatusCode,
    },
}

/// HTTP client for the ROI service.
#[derive(Clone)]
pub struct ScenarioClient {
    base: Url,
    http: reqwest::Client,
}

impl ScenarioClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(config.base_url.trim()).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                url: config.base_url,
                reason: "not a hierarchical url".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self { base, http })
    }

    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientConfig::default())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append `path` to the base, keeping any path prefix the base carries.
    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let joined = format!("{}{}", self.base.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| ClientError::InvalidBaseUrl {
            url: joined,
            reason: e.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        debug!(method = "GET", %url, "scenario api request");
        let resp = self.http.get(url).send().await?;
        Self::check_status("GET", path, resp.status())?;
        Ok(resp.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(path)?;
        debug!(method = "POST", %url, "scenario api request");
        let resp = self.http.post(url).json(body).send().await?;
        Self::check_status("POST", path, resp.status())?;
        Ok(resp.json().await?)
    }

    fn check_status(method: &'static str, path: &str, status: StatusCode) -> Result<(), ClientError> {
        if status.is_success() {
            Ok(())
        } else {
            Err(ClientError::Status {
                method,
                path: path.to_string(),
                status,
            })
        }
    }
}

#[async_trait(?Send)]
impl ScenarioApi for ScenarioClient {
    type Error = ClientError;

    async fn simulate(&self, input: &ScenarioInput) -> Result<ScenarioResult, ClientError> {
        self.post_json(paths::SIMULATE, input).await
    }

    async fn save_scenario(&self, input: &ScenarioInput) -> Result<SaveAck, ClientError> {
        self.post_json(paths::SCENARIOS, input).await
    }

    async fn list_scenarios(&self) -> Result<Vec<ScenarioSummary>, ClientError> {
        self.get_json(paths::SCENARIOS).await
    }

    async fn fetch_scenario(&self, id: &ScenarioId) -> Result<ScenarioInput, ClientError> {
        self.get_json(&paths::scenario(id)).await
    }

    async fn generate_report(&self, request: &ReportRequest) -> Result<ReportReceipt, ClientError> {
        let url = self.endpoint(paths::GENERATE_REPORT)?;
        debug!(method = "POST", %url, "scenario api request");
        let resp = self.http.post(url).json(request).send().await?;
        let status = resp.status();
        // Rejections come back as 4xx with an `{ok: false, error}` body.
        let body = resp.bytes().await?;
        match serde_json::from_slice::<ReportReceipt>(&body) {
            Ok(receipt) if status.is_success() || !receipt.ok => Ok(receipt),
            Ok(_) => Err(ClientError::Status {
                method: "POST",
                path: paths::GENERATE_REPORT.to_string(),
                status,
            }),
            Err(e) => {
                Self::check_status("POST", paths::GENERATE_REPORT, status)?;
                Err(ClientError::Decode(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_prefix() {
        let client = ScenarioClient::new(ClientConfig::new("http://localhost:8080/roi/")).unwrap();
        assert_eq!(
            client.endpoint(paths::SIMULATE).unwrap().as_str(),
            "http://localhost:8080/roi/simulate"
        );
        let id = ScenarioId::new("12");
        assert_eq!(
            client.endpoint(&paths::scenario(&id)).unwrap().as_str(),
            "http://localhost:8080/roi/scenarios/12"
        );
    }

    #[test]
    fn endpoint_on_bare_host() {
        let client = ScenarioClient::new(ClientConfig::new("http://127.0.0.1:5000")).unwrap();
        assert_eq!(
            client.endpoint(paths::SCENARIOS).unwrap().as_str(),
            "http://127.0.0.1:5000/scenarios"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = ScenarioClient::new(ClientConfig::new("not a url")).err().unwrap();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
        let err = ScenarioClient::new(ClientConfig::new("mailto:ap@example.com"))
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn config_builders_override_defaults() {
        let cfg = ClientConfig::new("http://a")
            .with_base_url("http://b")
            .with_user_agent("probe/1");
        assert_eq!(cfg.base_url, "http://b");
        assert_eq!(cfg.user_agent, "probe/1");
    }
}
