use std::sync::Arc;

use reqwest::Client;

use crate::client::{ApiClient, Session};
use crate::config::AppConfig;

/// Shared across workers. Holds nothing that changes after startup.
pub struct AppState {
    pub config: AppConfig,
    pub redirect_base: String,
    pub http: Client,
}

impl AppState {
    pub fn new(config: AppConfig, redirect_base: String, http: Client) -> Self {
        Self {
            config,
            redirect_base,
            http,
        }
    }

    /// Upstream client acting for one request's bearer token.
    pub fn api_client(&self, token: &str) -> ApiClient {
        let session = Session::new(Some(token.to_string()), self.config.login_path.clone());
        ApiClient::new(self.http.clone(), &self.config.api_base, Arc::new(session))
    }
}
