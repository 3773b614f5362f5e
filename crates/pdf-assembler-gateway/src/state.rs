use anyhow::Result;
use reqwest::Client;
use std::time::Duration;

/// Gateway configuration and the shared upstream client.
///
/// Both settings are optional so a misconfigured gateway still starts and
/// answers every proxied request with a 500 naming what is missing.
pub struct GatewayState {
    pub client: Client,
    /// Backend origin, e.g. "http://localhost:8000"
    pub api_base: Option<String>,
    /// Credential injected as `X-API-Key`; never sent to the browser
    pub api_key: Option<String>,
}

impl GatewayState {
    pub fn new(api_base: Option<String>, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.filter(|s| !s.trim().is_empty()),
            api_key: api_key.filter(|s| !s.is_empty()),
        })
    }

    /// Names of the settings that are missing, for startup reporting.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_base.is_none() {
            missing.push("API_BASE_URL");
        }
        if self.api_key.is_none() {
            missing.push("API_KEY");
        }
        missing
    }
}
