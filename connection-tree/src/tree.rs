//! Arena-backed connection tree
//!
//! Every rendered profile is a [`NodeRecord`] in one `Vec`, linked to its
//! parent and children by [`NodeKey`]. Each node carries its own expansion
//! and child-loading state, so sibling fetches never touch each other.
//!
//! # Transitions
//!
//! [`ConnectionTree::activate`] is the only way expansion changes:
//!
//! | node                         | result                             |
//! |------------------------------|------------------------------------|
//! | root                         | ignored, root stays expanded       |
//! | `total_connection == 0`      | ignored                            |
//! | child fetch in flight        | ignored                            |
//! | expanded                     | collapsed, children kept           |
//! | collapsed, children fetched  | expanded                           |
//! | collapsed, not fetched/failed| expanded + [`FetchRequest`] issued |
//!
//! [`ConnectionTree::complete_fetch`] applies the fetch result.

use std::collections::HashMap;
use std::fmt;

use shared_types::{ConnectionNode, ProfileId};

use crate::error::{FetchError, TreeError};

/// Arena index of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(usize);

impl NodeKey {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display and metric fields of a node, without its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub id: ProfileId,
    pub display_name: String,
    pub profile_image_path: String,
    pub cleared_point: u64,
    pub uncleared_point: u64,
    pub company_logo: Option<String>,
    pub total_connection: u32,
}

impl ConnectionProfile {
    fn split(node: ConnectionNode) -> (Self, Vec<ConnectionNode>) {
        let profile = Self {
            id: node.user_profile_id,
            display_name: node.display_name,
            profile_image_path: node.profile_image_path,
            cleared_point: node.cleared_point,
            uncleared_point: node.uncleared_point,
            company_logo: node.company_logo,
            total_connection: node.total_connection,
        };
        (profile, node.child)
    }

    pub fn is_expandable(&self) -> bool {
        self.total_connection > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    Collapsed,
    Expanded,
}

/// What is known about a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildState {
    NotFetched,
    Fetching,
    /// Children known, possibly none. Never fetched again.
    Fetched,
    /// Last fetch failed; the next expansion tries again.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Root,
    Leaf,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub node: NodeKey,
    pub profile_id: ProfileId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Ignored(IgnoreReason),
    Collapsed,
    Expanded,
    /// Expanded with children still unknown; the caller must fetch them and
    /// hand the result to [`ConnectionTree::complete_fetch`].
    FetchChildren(FetchRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { children: usize },
    Failed,
    /// The node was no longer waiting for this result.
    Discarded,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) profile: ConnectionProfile,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
    pub(crate) depth: usize,
    pub(crate) expansion: Expansion,
    pub(crate) child_state: ChildState,
}

#[derive(Debug, Clone)]
pub struct ConnectionTree {
    nodes: Vec<NodeRecord>,
    by_profile: HashMap<ProfileId, NodeKey>,
    root: NodeKey,
}

impl ConnectionTree {
    /// Build the tree from the root payload. Nested `child` arrays already
    /// present in the payload become fetched children.
    pub fn from_root(root: ConnectionNode) -> Self {
        let (profile, children) = ConnectionProfile::split(root);
        let mut tree = Self {
            nodes: Vec::new(),
            by_profile: HashMap::new(),
            root: NodeKey(0),
        };

        let root = tree.push(profile, None, 0, ChildState::Fetched);
        tree.nodes[root.0].expansion = Expansion::Expanded;
        tree.root = root;
        tree.attach(root, children);
        tree
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn find(&self, id: ProfileId) -> Result<NodeKey, TreeError> {
        self.by_profile
            .get(&id)
            .copied()
            .ok_or(TreeError::UnknownProfile(id))
    }

    pub fn profile(&self, key: NodeKey) -> Result<&ConnectionProfile, TreeError> {
        Ok(&self.record(key)?.profile)
    }

    pub fn parent(&self, key: NodeKey) -> Result<Option<NodeKey>, TreeError> {
        Ok(self.record(key)?.parent)
    }

    pub fn children(&self, key: NodeKey) -> Result<&[NodeKey], TreeError> {
        Ok(&self.record(key)?.children)
    }

    pub fn depth(&self, key: NodeKey) -> Result<usize, TreeError> {
        Ok(self.record(key)?.depth)
    }

    pub fn child_state(&self, key: NodeKey) -> Result<ChildState, TreeError> {
        Ok(self.record(key)?.child_state)
    }

    /// Stored expansion. The root is created expanded and no transition
    /// ever collapses it.
    pub fn expansion(&self, key: NodeKey) -> Result<Expansion, TreeError> {
        Ok(self.record(key)?.expansion)
    }

    /// Whether the node's children area is shown.
    pub fn is_expanded(&self, key: NodeKey) -> Result<bool, TreeError> {
        let record = self.record(key)?;
        Ok(key == self.root || record.expansion == Expansion::Expanded)
    }

    pub fn is_loading(&self, key: NodeKey) -> Result<bool, TreeError> {
        Ok(self.record(key)?.child_state == ChildState::Fetching)
    }

    /// Apply a user activation (click) to `key`.
    pub fn activate(&mut self, key: NodeKey) -> Result<Activation, TreeError> {
        let is_root = key == self.root;
        let record = self.record_mut(key)?;

        if is_root {
            return Ok(Activation::Ignored(IgnoreReason::Root));
        }
        if !record.profile.is_expandable() {
            return Ok(Activation::Ignored(IgnoreReason::Leaf));
        }

        let activation = match (record.expansion, record.child_state) {
            (_, ChildState::Fetching) => Activation::Ignored(IgnoreReason::InFlight),
            (Expansion::Expanded, _) => {
                record.expansion = Expansion::Collapsed;
                Activation::Collapsed
            }
            (Expansion::Collapsed, ChildState::Fetched) => {
                record.expansion = Expansion::Expanded;
                Activation::Expanded
            }
            (Expansion::Collapsed, ChildState::NotFetched | ChildState::Failed) => {
                record.expansion = Expansion::Expanded;
                record.child_state = ChildState::Fetching;
                Activation::FetchChildren(FetchRequest {
                    node: key,
                    profile_id: record.profile.id,
                })
            }
        };

        tracing::debug!(node = %key, profile_id = %record.profile.id, ?activation, "Node activated");
        Ok(activation)
    }

    /// Apply the result of the fetch issued by [`Self::activate`].
    ///
    /// A failed fetch leaves the node expanded with no children.
    pub fn complete_fetch(
        &mut self,
        request: FetchRequest,
        result: Result<ConnectionNode, FetchError>,
    ) -> Result<FetchOutcome, TreeError> {
        let record = self.record_mut(request.node)?;
        if record.child_state != ChildState::Fetching {
            tracing::debug!(
                node = %request.node,
                profile_id = %request.profile_id,
                "Discarding connections for node that is not loading"
            );
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(payload) => {
                if payload.user_profile_id != request.profile_id {
                    tracing::warn!(
                        requested = %request.profile_id,
                        received = %payload.user_profile_id,
                        "Connections response is for a different profile"
                    );
                }
                let children = self.attach(request.node, payload.child);
                self.nodes[request.node.0].child_state = ChildState::Fetched;
                tracing::debug!(
                    node = %request.node,
                    profile_id = %request.profile_id,
                    children,
                    "Connections loaded"
                );
                Ok(FetchOutcome::Loaded { children })
            }
            Err(error) => {
                record.child_state = ChildState::Failed;
                tracing::warn!(
                    profile_id = %request.profile_id,
                    %error,
                    "Failed to load connections"
                );
                Ok(FetchOutcome::Failed)
            }
        }
    }

    pub(crate) fn record(&self, key: NodeKey) -> Result<&NodeRecord, TreeError> {
        self.nodes.get(key.0).ok_or(TreeError::UnknownNode(key))
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, TreeError> {
        self.nodes.get_mut(key.0).ok_or(TreeError::UnknownNode(key))
    }

    fn push(
        &mut self,
        profile: ConnectionProfile,
        parent: Option<NodeKey>,
        depth: usize,
        child_state: ChildState,
    ) -> NodeKey {
        let key = NodeKey(self.nodes.len());
        let id = profile.id;
        if self.by_profile.contains_key(&id) {
            tracing::warn!(profile_id = %id, node = %key, "Duplicate profile in connection tree");
        } else {
            self.by_profile.insert(id, key);
        }

        self.nodes.push(NodeRecord {
            profile,
            parent,
            children: Vec::new(),
            depth,
            expansion: Expansion::Collapsed,
            child_state,
        });
        key
    }

    /// Append `children` (and any nested payload) under `parent` with an
    /// explicit work list. Returns the number of direct children added.
    fn attach(&mut self, parent: NodeKey, children: Vec<ConnectionNode>) -> usize {
        let direct = children.len();
        let mut pending = vec![(parent, children)];

        while let Some((parent, children)) = pending.pop() {
            let depth = self.nodes[parent.0].depth + 1;
            for node in children {
                let (profile, nested) = ConnectionProfile::split(node);
                let state = if nested.is_empty() {
                    ChildState::NotFetched
                } else {
                    ChildState::Fetched
                };
                let key = self.push(profile, Some(parent), depth, state);
                self.nodes[parent.0].children.push(key);
                if !nested.is_empty() {
                    pending.push((key, nested));
                }
            }
        }

        direct
    }
}
