//! Derivation of the authoritative paint order from the group tree.
//!
//! Ordering contract:
//! - Index 0 of the result is the topmost layer.
//! - Background layers come first, in their original relative order.
//! - The rest follows the tree: groups and their `nodes` are both walked
//!   last-to-first, recursively, so the end of a `nodes` list is its top.

use std::collections::HashMap;

use crate::error::TocError;
use crate::model::{Layer, Node};

/// Layers per id, in flat order.
fn layers_by_id(layers: &[Layer]) -> HashMap<&str, Vec<&Layer>> {
    let mut by_id: HashMap<&str, Vec<&Layer>> = HashMap::with_capacity(layers.len());
    for layer in layers {
        by_id.entry(layer.id.as_str()).or_default().push(layer);
    }
    by_id
}

/// Layer a leaf under `group_id` stands for.
///
/// An id shared by layers of different groups resolves to the one filed
/// under the enclosing group; otherwise the first layer with that id wins.
fn resolve<'l>(
    by_id: &HashMap<&str, Vec<&'l Layer>>,
    id: &str,
    group_id: Option<&str>,
) -> Option<&'l Layer> {
    let candidates = by_id.get(id)?;
    group_id
        .and_then(|g| candidates.iter().find(|l| l.group_id() == g))
        .or_else(|| candidates.first())
        .copied()
}

fn walk<'a>(
    nodes: &'a [Node],
    group_id: Option<&str>,
    by_id: &HashMap<&str, Vec<&Layer>>,
    out: &mut Vec<Layer>,
    missing: &mut Vec<&'a str>,
) {
    for node in nodes.iter().rev() {
        match node {
            Node::Group(group) => walk(&group.nodes, Some(&group.id), by_id, out, missing),
            Node::Layer(id) => match resolve(by_id, id, group_id) {
                Some(layer) => out.push(layer.clone()),
                None => missing.push(id),
            },
        }
    }
}

/// Tree-ordered layers, backgrounds not included.
///
/// Ids the tree references but `all_layers` lacks are skipped and logged.
pub fn reorder_layers(groups: &[Node], all_layers: &[Layer]) -> Vec<Layer> {
    let by_id = layers_by_id(all_layers);
    let mut out = Vec::with_capacity(all_layers.len());
    let mut missing = Vec::new();
    walk(groups, None, &by_id, &mut out, &mut missing);
    if !missing.is_empty() {
        tracing::warn!("group tree references unknown layers, skipped: {missing:?}");
    }
    out
}

fn backgrounds(all_layers: &[Layer]) -> impl Iterator<Item = Layer> + '_ {
    all_layers.iter().filter(|l| l.is_background()).cloned()
}

/// Backgrounds first, then the tree order.
pub fn reorder(groups: &[Node], all_layers: &[Layer]) -> Vec<Layer> {
    let mut out: Vec<Layer> = backgrounds(all_layers).collect();
    out.extend(reorder_layers(groups, all_layers));
    out
}

/// Same order as [`reorder`]; name used by the TOC sort gesture.
pub fn sort_layers(groups: &[Node], all_layers: &[Layer]) -> Vec<Layer> {
    reorder(groups, all_layers)
}

/// Like [`reorder`] but fails on the first id with no matching layer.
pub fn reorder_strict(groups: &[Node], all_layers: &[Layer]) -> Result<Vec<Layer>, TocError> {
    let by_id = layers_by_id(all_layers);
    let mut out: Vec<Layer> = backgrounds(all_layers).collect();
    let mut missing = Vec::new();
    walk(groups, None, &by_id, &mut out, &mut missing);
    match missing.first() {
        Some(id) => Err(TocError::MissingLayer(id.to_string())),
        None => Ok(out),
    }
}
