//! Business connections tree
//!
//! Target-independent core of the connections viewer:
//! - [`fetcher`]: the two-endpoint fetch contract and body decoding
//! - [`tree`]: arena of node records with a guarded per-node state machine
//! - [`render`]: visible-row walk and text cards
//! - [`controller`]: runs one activation end to end against a fetcher
//! - [`page`]: root load state for the whole view
//!
//! The web front end drives the same controller through a Dioxus signal.

pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod page;
pub mod render;
pub mod tree;

pub use config::ApiConfig;
pub use controller::{activate, ActivationReport, TreeHandle};
pub use error::{FetchError, TreeError};
pub use fetcher::{decode_connection_node, decode_user_details, load_root, ConnectionFetcher};
pub use page::{load_page, page_status_text, PageState};
pub use render::{connections_label, marker, points_label, render_text, RenderRow};
pub use tree::{
    Activation, ChildState, ConnectionProfile, ConnectionTree, Expansion, FetchOutcome,
    FetchRequest, IgnoreReason, NodeKey,
};

pub use shared_types::{ConnectionNode, ProfileId, UserDetails};
