//! Drag-and-drop reordering of one node's children.

use foundation::ROOT_GROUP_ID;
use serde::{Deserialize, Serialize};

use crate::error::TocError;
use crate::lookup::{GroupChange, deep_change, get_group};
use crate::model::{Layer, MapConfig, Node};
use crate::reorder::reorder;
use crate::split::split_of;

/// TOC configuration consulted before a sort gesture is honoured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TocSettings {
    pub activate_sort_layer: bool,
    /// Active search text; any non-blank filter disables sorting.
    pub filter_text: String,
}

impl Default for TocSettings {
    fn default() -> Self {
        Self {
            activate_sort_layer: true,
            filter_text: String::new(),
        }
    }
}

impl TocSettings {
    pub fn sorting_enabled(&self) -> bool {
        self.activate_sort_layer && self.filter_text.trim().is_empty()
    }
}

/// Checks that `order` is a permutation of `0..len`.
pub fn validate_order(order: &[usize], len: usize) -> Result<(), TocError> {
    let invalid = || TocError::InvalidOrder {
        len,
        order: order.to_vec(),
    };
    if order.len() != len {
        return Err(invalid());
    }
    let mut seen = vec![false; len];
    for &i in order {
        match seen.get_mut(i) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(invalid()),
        }
    }
    Ok(())
}

/// Children of `node_id`, or the top level for `root`.
pub fn target_nodes<'a>(groups: &'a [Node], node_id: &str) -> Option<&'a [Node]> {
    if node_id == ROOT_GROUP_ID {
        return Some(groups);
    }
    get_group(groups, node_id).map(|g| g.nodes.as_slice())
}

/// Returns the tree with the children of `node_id` permuted by `order`.
///
/// `order[new_position]` is the child's original index.
pub fn reorder_children(
    groups: &[Node],
    node_id: &str,
    order: &[usize],
) -> Result<Vec<Node>, TocError> {
    let target =
        target_nodes(groups, node_id).ok_or_else(|| TocError::UnknownNode(node_id.to_string()))?;
    validate_order(order, target.len())?;
    let reordered: Vec<Node> = order.iter().map(|&i| target[i].clone()).collect();
    match get_group(groups, node_id) {
        Some(group) if node_id != ROOT_GROUP_ID => Ok(deep_change(
            groups,
            &group.id,
            &GroupChange::Nodes(reordered),
        )),
        _ => Ok(reordered),
    }
}

/// Result of a sort gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortOutcome {
    /// New paint order; the part to persist.
    pub layers: Vec<Layer>,
    /// Reordered tree, kept for `expanded`/`title` metadata.
    pub groups: Vec<Node>,
}

/// Applies a TOC drag-and-drop gesture to a map.
///
/// Returns `None` (nothing to dispatch) when sorting is disabled or a filter
/// is active, when `node_id` is unknown, or when `order` is not a valid
/// permutation of the target's children.
pub fn sort_node(
    map: &MapConfig,
    node_id: &str,
    order: &[usize],
    settings: &TocSettings,
) -> Option<SortOutcome> {
    if !settings.sorting_enabled() {
        tracing::debug!("sort of {node_id} ignored: sorting disabled or filter active");
        return None;
    }
    let split = split_of(map);
    let groups = match reorder_children(&split.groups, node_id, order) {
        Ok(groups) => groups,
        Err(err) => {
            tracing::debug!("sort of {node_id} ignored: {err}");
            return None;
        }
    };
    Some(SortOutcome {
        layers: reorder(&groups, &split.flat),
        groups,
    })
}
