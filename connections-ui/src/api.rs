use async_trait::async_trait;
use connection_tree::{
    decode_connection_node, decode_user_details, ApiConfig, ConnectionFetcher, FetchError,
};
use gloo_net::http::Request;
use shared_types::{ConnectionNode, ProfileId};
use std::sync::OnceLock;

/// Resolve the API location from the page's hostname
/// - In development (localhost): use http://localhost:8080
/// - In production: use same origin (API serves static files)
fn get_api_config() -> ApiConfig {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    ApiConfig::for_hostname(&hostname)
}

/// Lazy-static equivalent for WASM - computed at first use
static API_CONFIG_CACHE: OnceLock<ApiConfig> = OnceLock::new();

pub fn api_config() -> &'static ApiConfig {
    API_CONFIG_CACHE.get_or_init(get_api_config)
}

/// Browser fetcher for the two connections endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFetcher {
    config: ApiConfig,
}

impl HttpFetcher {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn from_location() -> Self {
        Self::new(api_config().clone())
    }
}

async fn get_body(url: &str) -> Result<String, FetchError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::Transport(format!("failed to read body: {e}")))
}

#[async_trait(?Send)]
impl ConnectionFetcher for HttpFetcher {
    async fn current_user_id(&self) -> Result<ProfileId, FetchError> {
        let body = get_body(&self.config.user_details_url()).await?;
        decode_user_details(&body)
    }

    async fn connection_tree(&self, user_id: ProfileId) -> Result<ConnectionNode, FetchError> {
        let body = get_body(&self.config.connections_url(user_id)).await?;
        decode_connection_node(&body)
    }
}
