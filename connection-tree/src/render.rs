use crate::tree::{ChildState, ConnectionProfile, ConnectionTree, Expansion, NodeKey};

/// One visible card, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRow {
    pub key: NodeKey,
    pub depth: usize,
    pub profile: ConnectionProfile,
    /// Children area shown. Always true for the root.
    pub expanded: bool,
    /// This node's own children are being fetched.
    pub loading: bool,
    pub expandable: bool,
}

impl ConnectionTree {
    /// Visible nodes in pre-order. Children of collapsed nodes are skipped.
    pub fn rows(&self) -> Vec<RenderRow> {
        let mut rows = Vec::new();
        let mut stack = vec![self.root()];

        while let Some(key) = stack.pop() {
            let Ok(record) = self.record(key) else {
                continue;
            };
            let expanded = key == self.root() || record.expansion == Expansion::Expanded;

            rows.push(RenderRow {
                key,
                depth: record.depth,
                profile: record.profile.clone(),
                expanded,
                loading: record.child_state == ChildState::Fetching,
                expandable: record.profile.is_expandable(),
            });

            if expanded {
                stack.extend(record.children.iter().rev().copied());
            }
        }

        rows
    }
}

pub fn points_label(profile: &ConnectionProfile) -> String {
    format!("✅ {} | ⏳ {}", profile.cleared_point, profile.uncleared_point)
}

pub fn connections_label(profile: &ConnectionProfile) -> String {
    format!("Connections: {}", profile.total_connection)
}

pub fn marker(row: &RenderRow) -> &'static str {
    match (row.expandable, row.expanded) {
        (false, _) => "•",
        (true, true) => "▾",
        (true, false) => "▸",
    }
}

/// Text drawing of the visible tree, two spaces per level.
pub fn render_text(tree: &ConnectionTree) -> String {
    let mut out = String::new();
    for row in tree.rows() {
        let indent = "  ".repeat(row.depth);
        out.push_str(&format!(
            "{indent}{} {} [{}] {}  {}\n",
            marker(&row),
            row.profile.display_name,
            row.profile.id,
            points_label(&row.profile),
            connections_label(&row.profile),
        ));
        if row.loading {
            out.push_str(&format!("{indent}  Loading...\n"));
        }
    }
    out
}
