use shared_types::ProfileId;

pub const USER_DETAILS_PATH: &str = "/api/user/getUserDetails";
pub const CONNECTIONS_PATH: &str = "/api/order/myConnections";

/// Where the connections endpoints live.
///
/// An empty base means same origin (relative URLs).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn same_origin() -> Self {
        Self::default()
    }

    /// Dev servers on localhost talk to the API on port 8080; anything else
    /// is served from the same origin as the API.
    pub fn for_hostname(hostname: &str) -> Self {
        if hostname == "localhost" || hostname == "127.0.0.1" {
            Self::new("http://localhost:8080")
        } else {
            Self::same_origin()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_details_url(&self) -> String {
        format!("{}{}", self.base_url, USER_DETAILS_PATH)
    }

    pub fn connections_url(&self, user_id: ProfileId) -> String {
        format!("{}{}/{}", self.base_url, CONNECTIONS_PATH, user_id)
    }
}
