use crate::fetcher::{load_root, ConnectionFetcher};
use crate::tree::ConnectionTree;

/// Load state of the whole connections view.
#[derive(Debug, Clone, Default)]
pub enum PageState {
    #[default]
    Loading,
    Ready(ConnectionTree),
    /// Root load failed at either endpoint.
    NotFound,
}

impl PageState {
    pub fn tree(&self) -> Option<&ConnectionTree> {
        match self {
            Self::Ready(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn tree_mut(&mut self) -> Option<&mut ConnectionTree> {
        match self {
            Self::Ready(tree) => Some(tree),
            _ => None,
        }
    }
}

pub fn page_status_text(state: &PageState) -> Option<&'static str> {
    match state {
        PageState::Loading => Some("Loading connections..."),
        PageState::Ready(_) => None,
        PageState::NotFound => Some("No connections found."),
    }
}

pub async fn load_page<F>(fetcher: &F) -> PageState
where
    F: ConnectionFetcher + ?Sized,
{
    match load_root(fetcher).await {
        Ok(root) => {
            let tree = ConnectionTree::from_root(root);
            tracing::info!(nodes = tree.node_count(), "Connection tree loaded");
            PageState::Ready(tree)
        }
        Err(error) => {
            tracing::error!(%error, "Failed to load connection tree");
            PageState::NotFound
        }
    }
}
