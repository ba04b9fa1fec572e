use shared_types::ProfileId;

use crate::tree::NodeKey;

/// Failure of one call to a connections endpoint.
///
/// The view never shows these to the user; they are logged and folded into
/// the page or node state.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error: {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse JSON: {0}")]
    Parse(String),
}

impl FetchError {
    /// Non-success status or a request that never completed.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Transport(_))
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node not found: key={0}")]
    UnknownNode(NodeKey),

    #[error("Profile not in tree: id={0}")]
    UnknownProfile(ProfileId),

    #[error("Connection tree was dropped")]
    Detached,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_transport_count_as_network_errors() {
        let status = FetchError::Status {
            url: "/api/user/getUserDetails".to_string(),
            status: 503,
        };
        assert!(status.is_network());
        assert!(FetchError::Transport("offline".to_string()).is_network());
        assert!(!FetchError::Parse("eof".to_string()).is_network());
    }

    #[test]
    fn serde_errors_become_parse_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(FetchError::from(err), FetchError::Parse(_)));
    }

    #[test]
    fn status_message_names_url() {
        let err = FetchError::Status {
            url: "/api/order/myConnections/7".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "HTTP error: 404 from /api/order/myConnections/7"
        );
    }
}
