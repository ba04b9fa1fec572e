//! Shared types between the connections endpoints and the tree front end
//!
//! These types describe the two JSON bodies the connection tree consumes:
//! - `GET /api/user/getUserDetails` -> [`UserDetails`]
//! - `GET /api/order/myConnections/{userId}` -> [`ConnectionNode`]
//!
//! Serializable with serde; TypeScript bindings are exported with ts-rs.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// ============================================================================
// Identity
// ============================================================================

/// Numeric user/business profile id
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(transparent)]
#[ts(export, export_to = "../../connections-ui/src/types/generated.ts")]
pub struct ProfileId(#[ts(type = "number")] pub i64);

impl ProfileId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ProfileId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of the current-user identity endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../connections-ui/src/types/generated.ts")]
pub struct UserDetails {
    pub user_profile_id: ProfileId,
}

// ============================================================================
// Connection Tree
// ============================================================================

/// One profile in the referral/connection graph, as returned by
/// `myConnections`. The `child` array is the node's direct connections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../../connections-ui/src/types/generated.ts")]
pub struct ConnectionNode {
    pub user_profile_id: ProfileId,

    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub profile_image_path: String,

    /// Points already cleared. Sent as a float by the server, so whole
    /// values above 2^53 arrive already rounded to `f64` precision.
    #[serde(default, deserialize_with = "points")]
    #[ts(type = "number")]
    pub cleared_point: u64,

    /// Points still pending.
    #[serde(default, deserialize_with = "points")]
    #[ts(type = "number")]
    pub uncleared_point: u64,

    #[serde(default)]
    pub company_logo: Option<String>,

    /// Zero means leaf.
    #[serde(default)]
    pub total_connection: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub child: Vec<ConnectionNode>,
}

impl ConnectionNode {
    /// A leaf (no connections) can never be expanded.
    pub fn is_expandable(&self) -> bool {
        self.total_connection > 0
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn points<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(0);
    };

    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value >= u64::MAX as f64 {
        return Err(D::Error::custom(format!(
            "expected a non-negative whole point count, got {value}"
        )));
    }

    Ok(value as u64)
}
