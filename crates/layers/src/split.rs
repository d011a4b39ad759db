use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::lookup::deep_update;
use crate::model::{Group, GroupOverride, Layer, MapConfig, MapLayers, Node, SplitLayers, Title};
use crate::normalize::{index_layers, normalize_layers};
use crate::reorder::reorder;
use crate::synthesis::get_layers_by_group;

/// Applies saved group metadata onto a synthesized tree.
///
/// A given title also carries `description` and the tooltip settings along;
/// `expanded` is always applied. Ids not in the tree are ignored.
pub fn apply_group_overrides(groups: Vec<Node>, overrides: &[GroupOverride]) -> Vec<Node> {
    overrides.iter().fold(groups, |groups, o| {
        deep_update(&groups, &o.id, &|group: &mut Group| {
            if let Some(title) = &o.title {
                group.title = Some(title.clone());
                for (key, value) in [
                    ("description", &o.description),
                    ("tooltipOptions", &o.tooltip_options),
                    ("tooltipPlacement", &o.tooltip_placement),
                ] {
                    match value {
                        Some(v) => {
                            group.extra.insert(key.to_string(), v.clone());
                        }
                        None => {
                            group.extra.remove(key);
                        }
                    }
                }
            }
            group.expanded = o.expanded;
        })
    })
}

/// Normalizes a flat layer list (plus optional overrides) into `{flat, groups}`.
///
/// Layers without an id get a positional one and every layer gets its
/// `storeIndex` here, before the tree is synthesized.
pub fn split_layers(layers: &[Layer], overrides: Option<&[GroupOverride]>) -> SplitLayers {
    let indexed = index_layers(&normalize_layers(layers));
    let mut groups = get_layers_by_group(&indexed);
    if let Some(overrides) = overrides {
        groups = apply_group_overrides(groups, overrides);
    }
    SplitLayers {
        flat: reorder(&groups, &indexed),
        groups,
    }
}

/// Replaces a flat `layers` list with its `{flat, groups}` form.
///
/// A map whose layers are already split is returned unchanged.
pub fn split_map_and_layers(map: MapConfig) -> MapConfig {
    let MapLayers::Flat(layers) = &map.layers else {
        return map;
    };
    let split = split_layers(layers, map.groups.as_deref());
    MapConfig {
        layers: MapLayers::Split(split),
        ..map
    }
}

/// The `{flat, groups}` form of a map, splitting it if needed.
pub fn split_of(map: &MapConfig) -> SplitLayers {
    match &map.layers {
        MapLayers::Flat(layers) => split_layers(layers, map.groups.as_deref()),
        MapLayers::Split(split) => split.clone(),
    }
}

/// A group whose `nodes` hold full layers, with derived visibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DenormalizedGroup {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    pub expanded: bool,
    /// True iff every child is visible.
    pub visibility: bool,
    pub nodes: Vec<DenormalizedNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DenormalizedNode {
    Layer(Layer),
    Group(DenormalizedGroup),
}

impl DenormalizedNode {
    pub fn is_visible(&self) -> bool {
        match self {
            DenormalizedNode::Layer(layer) => layer.is_visible(),
            DenormalizedNode::Group(group) => group.visibility,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Denormalized {
    pub flat: Vec<Layer>,
    pub groups: Vec<DenormalizedNode>,
}

fn inflate(nodes: &[Node], by_id: &HashMap<&str, &Layer>) -> Vec<DenormalizedNode> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Group(group) => {
                let children = inflate(&group.nodes, by_id);
                Some(DenormalizedNode::Group(DenormalizedGroup {
                    id: group.id.clone(),
                    name: group.name.clone(),
                    title: group.title.clone(),
                    expanded: group.expanded,
                    visibility: children.iter().all(DenormalizedNode::is_visible),
                    nodes: children,
                    extra: group.extra.clone(),
                }))
            }
            Node::Layer(id) => match by_id.get(id.as_str()) {
                Some(layer) => Some(DenormalizedNode::Layer((*layer).clone())),
                None => {
                    tracing::warn!("denormalize: group references unknown layer {id}");
                    None
                }
            },
        })
        .collect()
}

/// Inflates id references into full layers and derives group visibility.
///
/// Children are inflated before their parent, so a parent's visibility
/// already accounts for every descendant.
pub fn denormalize_groups(all_layers: &[Layer], groups: &[Node]) -> Denormalized {
    // `expanded` is a plain bool on layers, absent already reads as false.
    let flat: Vec<Layer> = all_layers.to_vec();
    let mut by_id = HashMap::with_capacity(flat.len());
    for layer in &flat {
        by_id.entry(layer.id.as_str()).or_insert(layer);
    }
    let groups = inflate(groups, &by_id);
    Denormalized { flat, groups }
}
