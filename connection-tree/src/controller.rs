use std::cell::RefCell;
use std::rc::Weak;

use crate::error::TreeError;
use crate::fetcher::ConnectionFetcher;
use crate::page::PageState;
use crate::tree::{Activation, ConnectionTree, FetchOutcome, NodeKey};

/// Short-lived access to the tree an activation runs against.
///
/// `with_tree` returns `None` once there is no tree to reach: the owner was
/// dropped, or the page no longer holds a loaded tree.
pub trait TreeHandle {
    fn with_tree<R>(&self, f: impl FnOnce(&mut ConnectionTree) -> R) -> Option<R>;
}

impl TreeHandle for Weak<RefCell<ConnectionTree>> {
    fn with_tree<R>(&self, f: impl FnOnce(&mut ConnectionTree) -> R) -> Option<R> {
        let tree = self.upgrade()?;
        let mut tree = tree.borrow_mut();
        Some(f(&mut tree))
    }
}

impl TreeHandle for Weak<RefCell<PageState>> {
    fn with_tree<R>(&self, f: impl FnOnce(&mut ConnectionTree) -> R) -> Option<R> {
        let page = self.upgrade()?;
        let mut page = page.borrow_mut();
        let result = page.tree_mut().map(f);
        result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationReport {
    pub activation: Activation,
    /// Set when the activation issued a fetch.
    pub fetch: Option<FetchOutcome>,
}

/// Run one activation on `key`, fetching children when the transition asks
/// for it.
///
/// The tree is only reached through `handle`, and never across the await:
/// if it is gone by the time the fetch returns, the result is discarded.
pub async fn activate<H, F>(
    handle: H,
    fetcher: &F,
    key: NodeKey,
) -> Result<ActivationReport, TreeError>
where
    H: TreeHandle,
    F: ConnectionFetcher + ?Sized,
{
    let activation = handle
        .with_tree(|tree| tree.activate(key))
        .ok_or(TreeError::Detached)??;

    let Activation::FetchChildren(request) = activation else {
        return Ok(ActivationReport {
            activation,
            fetch: None,
        });
    };

    let result = fetcher.connection_tree(request.profile_id).await;

    let outcome = match handle.with_tree(|tree| tree.complete_fetch(request, result)) {
        Some(outcome) => outcome?,
        None => {
            tracing::debug!(
                profile_id = %request.profile_id,
                "Connection tree dropped while loading, discarding result"
            );
            FetchOutcome::Discarded
        }
    };

    Ok(ActivationReport {
        activation,
        fetch: Some(outcome),
    })
}
