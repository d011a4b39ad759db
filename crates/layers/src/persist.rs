use crate::model::{GroupOverride, Layer, MapConfig, MapLayers, Node};
use crate::reducer::LayersState;

/// Saved metadata for every group of the tree, parents before children.
pub fn group_overrides(groups: &[Node]) -> Vec<GroupOverride> {
    let mut out = Vec::new();
    collect_overrides(groups, &mut out);
    out
}

fn collect_overrides(nodes: &[Node], out: &mut Vec<GroupOverride>) {
    for group in nodes.iter().filter_map(Node::as_group) {
        out.push(GroupOverride {
            id: group.id.clone(),
            title: group.title.clone(),
            expanded: group.expanded,
            description: group.extra.get("description").cloned(),
            tooltip_options: group.extra.get("tooltipOptions").cloned(),
            tooltip_placement: group.extra.get("tooltipPlacement").cloned(),
        });
        collect_overrides(&group.nodes, out);
    }
}

/// Map configuration to persist for `state`.
///
/// Layers are written in paint order without their `storeIndex`, which is
/// reassigned on load; the tree itself is rebuilt from each layer's `group`.
pub fn save_map(state: &LayersState) -> MapConfig {
    let layers = state
        .flat
        .iter()
        .map(|l| Layer {
            store_index: None,
            ..l.clone()
        })
        .collect();
    MapConfig {
        layers: MapLayers::Flat(layers),
        groups: Some(group_overrides(&state.groups)),
        extra: Default::default(),
    }
}
