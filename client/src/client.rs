//! HTTP client for the irrigation advisory endpoint

use reqwest::Client;
use shared::{AdviceForm, AdviceResponse, Observation, Prescription};

use crate::error::{ClientError, ClientResult};

/// Backend the advisory UI talks to when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Environment variable holding the backend base URL
pub const BACKEND_URL_ENV: &str = "FARM_BACKEND_URL";

/// Advisory API client
#[derive(Clone, Debug)]
pub struct AdvisoryClient {
    client: Client,
    base_url: String,
}

impl AdvisoryClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a client from `FARM_BACKEND_URL`, falling back to localhost.
    ///
    /// Meant for binaries embedding the client; tests point [`Self::new`] at
    /// their own server instead.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the server for the authoritative prescription.
    ///
    /// No retries and no timeout: a request runs until the server answers or
    /// the connection fails.
    pub async fn fetch_advice(&self, observation: &Observation) -> ClientResult<Prescription> {
        let url = format!("{}/irrigation_advice", self.base_url);
        let form = AdviceForm::from_observation(observation);

        tracing::debug!(%url, "requesting server advice");
        let response = self.client.post(&url).form(&form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: AdviceResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(data.into())
    }
}
