use async_trait::async_trait;
use shared_types::{ConnectionNode, ProfileId, UserDetails};

use crate::error::FetchError;

/// Source of connection data.
///
/// `connection_tree` serves both the initial root load and per-node child
/// loads: the response's `child` array is taken as that node's children.
/// Futures are not `Send` because browser fetches are not.
#[async_trait(?Send)]
pub trait ConnectionFetcher {
    async fn current_user_id(&self) -> Result<ProfileId, FetchError>;

    async fn connection_tree(&self, user_id: ProfileId) -> Result<ConnectionNode, FetchError>;
}

pub fn decode_user_details(body: &str) -> Result<ProfileId, FetchError> {
    let details: UserDetails = serde_json::from_str(body)?;
    Ok(details.user_profile_id)
}

pub fn decode_connection_node(body: &str) -> Result<ConnectionNode, FetchError> {
    Ok(serde_json::from_str(body)?)
}

/// Identity first, then that user's tree.
pub async fn load_root<F>(fetcher: &F) -> Result<ConnectionNode, FetchError>
where
    F: ConnectionFetcher + ?Sized,
{
    let user_id = fetcher.current_user_id().await?;
    tracing::debug!(%user_id, "Loading connection tree root");
    fetcher.connection_tree(user_id).await
}
