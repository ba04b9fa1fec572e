#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use connection_tree::{ConnectionFetcher, ConnectionNode, FetchError, ProfileId};
use futures::channel::oneshot;

pub fn node(id: i64, total: u32, child: Vec<ConnectionNode>) -> ConnectionNode {
    ConnectionNode {
        user_profile_id: ProfileId(id),
        display_name: format!("Profile {id}"),
        profile_image_path: format!("/uploads/profile/{id}.png"),
        cleared_point: 0,
        uncleared_point: 0,
        company_logo: None,
        total_connection: total,
        child,
    }
}

pub fn offline() -> FetchError {
    FetchError::Transport("network unreachable".to_string())
}

/// Answers from a fixed table and records every call.
#[derive(Default)]
pub struct ScriptedFetcher {
    user: Option<Result<ProfileId, FetchError>>,
    trees: HashMap<ProfileId, Result<ConnectionNode, FetchError>>,
    pub user_calls: RefCell<usize>,
    pub tree_calls: RefCell<Vec<ProfileId>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, result: Result<ProfileId, FetchError>) -> Self {
        self.user = Some(result);
        self
    }

    pub fn with_tree(mut self, id: i64, result: Result<ConnectionNode, FetchError>) -> Self {
        self.trees.insert(ProfileId(id), result);
        self
    }

    pub fn tree_calls_for(&self, id: i64) -> usize {
        self.tree_calls
            .borrow()
            .iter()
            .filter(|call| **call == ProfileId(id))
            .count()
    }

    pub fn total_tree_calls(&self) -> usize {
        self.tree_calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl ConnectionFetcher for ScriptedFetcher {
    async fn current_user_id(&self) -> Result<ProfileId, FetchError> {
        *self.user_calls.borrow_mut() += 1;
        self.user.clone().unwrap_or_else(|| {
            Err(FetchError::Status {
                url: "/api/user/getUserDetails".to_string(),
                status: 401,
            })
        })
    }

    async fn connection_tree(&self, user_id: ProfileId) -> Result<ConnectionNode, FetchError> {
        self.tree_calls.borrow_mut().push(user_id);
        self.trees.get(&user_id).cloned().unwrap_or_else(|| {
            Err(FetchError::Status {
                url: format!("/api/order/myConnections/{user_id}"),
                status: 404,
            })
        })
    }
}

/// Holds each child fetch open until the test releases it.
#[derive(Default)]
pub struct GatedFetcher {
    gates: RefCell<HashMap<ProfileId, oneshot::Receiver<Result<ConnectionNode, FetchError>>>>,
}

impl GatedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self, id: i64) -> oneshot::Sender<Result<ConnectionNode, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(ProfileId(id), rx);
        tx
    }
}

#[async_trait(?Send)]
impl ConnectionFetcher for GatedFetcher {
    async fn current_user_id(&self) -> Result<ProfileId, FetchError> {
        Err(FetchError::Transport("gated fetcher has no identity".to_string()))
    }

    async fn connection_tree(&self, user_id: ProfileId) -> Result<ConnectionNode, FetchError> {
        let gate = self.gates.borrow_mut().remove(&user_id);
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".to_string()))),
            None => Err(FetchError::Transport(format!("no gate for {user_id}"))),
        }
    }
}
