//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the parsed configuration and one pooled HTTP client used by the API
//! proxy. Both are cheap to clone.

use std::sync::Arc;
use std::time::Duration;

use crate::config::PortalConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<PortalConfig>,
    pub http: reqwest::Client,
}

impl AppState {
    /// # Errors
    ///
    /// Returns the reqwest error when the HTTP client cannot be built.
    pub fn new(config: PortalConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.proxy_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self { config: Arc::new(config), http })
    }
}
