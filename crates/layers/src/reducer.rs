//! TOC state and the pure transition function applied per dispatched action.

use std::collections::HashSet;

use foundation::{
    DEFAULT_GROUP_ID, GroupPath, PATH_SEPARATOR, ROOT_GROUP_ID, is_valid_new_group_label,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::lookup::{
    GroupChange, deep_change, deep_remove, deep_update, get_group, get_group_nodes, get_node,
    remove_empty_groups,
};
use crate::model::{Group, Layer, Node, SplitLayers, Title};
use crate::normalize::normalize_layer;
use crate::reorder::reorder;
use crate::selection::{NodeType, select_nodes};
use crate::sort::reorder_children;
use crate::synthesis::place_layer;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayersState {
    pub flat: Vec<Layer>,
    pub groups: Vec<Node>,
    #[serde(default)]
    pub selected: Vec<String>,
    #[serde(default)]
    pub filter: String,
}

impl From<SplitLayers> for LayersState {
    fn from(split: SplitLayers) -> Self {
        Self {
            flat: split.flat,
            groups: split.groups,
            ..Self::default()
        }
    }
}

impl LayersState {
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.flat.iter().find(|l| l.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayersAction {
    /// Expand or collapse a group, or a layer's legend.
    ToggleNode {
        node: String,
        node_type: NodeType,
        status: bool,
    },
    SortNode {
        node: String,
        order: Vec<usize>,
    },
    RemoveNode {
        node: String,
        node_type: NodeType,
        #[serde(default)]
        remove_empty: bool,
    },
    AddLayer {
        layer: Layer,
        #[serde(default = "default_true")]
        foreground: bool,
    },
    RemoveLayer {
        layer_id: String,
    },
    AddGroup {
        title: String,
        #[serde(default)]
        parent: Option<String>,
        /// Segment id of the new group; generated when absent.
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        as_first: bool,
        #[serde(default)]
        options: Map<String, Value>,
    },
    ChangeGroupProperties {
        group: String,
        properties: Map<String, Value>,
    },
    ChangeLayerProperties {
        layers: Vec<String>,
        properties: Map<String, Value>,
    },
    /// Detach a node and insert it at `index` among `group_id`'s children.
    MoveNode {
        node: String,
        group_id: String,
        index: usize,
    },
    /// Merge `options` into one layer or group.
    UpdateNode {
        node: String,
        node_type: NodeType,
        #[serde(default)]
        options: Map<String, Value>,
    },
    SelectNode {
        id: String,
        #[serde(default)]
        ctrl_key: bool,
    },
    FilterLayers {
        text: String,
    },
    ClearLayers,
}

fn default_true() -> bool {
    true
}

impl LayersAction {
    pub fn kind(&self) -> &'static str {
        match self {
            LayersAction::ToggleNode { .. } => "toggle_node",
            LayersAction::SortNode { .. } => "sort_node",
            LayersAction::RemoveNode { .. } => "remove_node",
            LayersAction::AddLayer { .. } => "add_layer",
            LayersAction::RemoveLayer { .. } => "remove_layer",
            LayersAction::AddGroup { .. } => "add_group",
            LayersAction::ChangeGroupProperties { .. } => "change_group_properties",
            LayersAction::ChangeLayerProperties { .. } => "change_layer_properties",
            LayersAction::MoveNode { .. } => "move_node",
            LayersAction::UpdateNode { .. } => "update_node",
            LayersAction::SelectNode { .. } => "select_node",
            LayersAction::FilterLayers { .. } => "filter_layers",
            LayersAction::ClearLayers => "clear_layers",
        }
    }
}

/// Inserts `node` as the first or last child of `parent`, or of the top level.
fn insert_node(nodes: &[Node], node: &Node, parent: Option<&str>, as_first: bool) -> Vec<Node> {
    let push = |children: &[Node]| {
        let mut out = Vec::with_capacity(children.len() + 1);
        if as_first {
            out.push(node.clone());
            out.extend_from_slice(children);
        } else {
            out.extend_from_slice(children);
            out.push(node.clone());
        }
        out
    };
    let Some(parent) = parent else {
        return push(nodes);
    };
    nodes
        .iter()
        .map(|n| match n {
            Node::Group(g) if g.id == parent => Node::Group(Group {
                nodes: push(&g.nodes),
                ..g.clone()
            }),
            Node::Group(g) => Node::Group(Group {
                nodes: insert_node(&g.nodes, node, Some(parent), as_first),
                ..g.clone()
            }),
            Node::Layer(_) => n.clone(),
        })
        .collect()
}

fn default_group() -> Node {
    Node::Group(Group {
        id: DEFAULT_GROUP_ID.to_string(),
        name: DEFAULT_GROUP_ID.to_string(),
        title: Some(Title::from(DEFAULT_GROUP_ID)),
        expanded: true,
        ..Group::default()
    })
}

fn without_ids(selected: &[String], removed: &HashSet<String>) -> Vec<String> {
    selected
        .iter()
        .filter(|s| !removed.contains(s.as_str()))
        .cloned()
        .collect()
}

/// True for layers dropped along with group `group_id`.
///
/// Layers with no `group` attribute stay, even when `group_id` is `Default`.
fn filed_under(layer: &Layer, group_id: &str) -> bool {
    match layer.group.as_deref() {
        Some(group) if !group.is_empty() => {
            !layer.is_background() && GroupPath::new(group).is_within(group_id)
        }
        _ => false,
    }
}

/// Moves `id` from below `old` to below `new`.
fn rebase(id: &str, old: &str, new: &str) -> String {
    if GroupPath::new(id).is_within(old) {
        format!("{new}{}", &id[old.len()..])
    } else {
        id.to_string()
    }
}

fn rebase_group(group: &Group, old: &str, new: &str) -> Group {
    Group {
        id: rebase(&group.id, old, new),
        nodes: group
            .nodes
            .iter()
            .map(|n| match n {
                Node::Group(g) => Node::Group(rebase_group(g, old, new)),
                Node::Layer(_) => n.clone(),
            })
            .collect(),
        ..group.clone()
    }
}

/// Detaches `node_id` and inserts it at `index` among `group_id`'s children.
///
/// A moved group is re-rooted under the target, so `a.b` moved into `Default`
/// becomes `Default.b`, and the layers filed under it follow. `root` targets
/// the top level, which only accepts groups. Returns `None` when the node or
/// the target is unknown, or when the target lies inside the moved group.
fn move_node(
    state: &LayersState,
    node_id: &str,
    group_id: &str,
    index: usize,
) -> Option<(Vec<Layer>, Vec<Node>)> {
    let moving = get_node(&state.groups, node_id).filter(|n| n.id() == node_id)?;
    let to_root = group_id == ROOT_GROUP_ID;
    let (moved, flat): (Node, Vec<Layer>) = match moving {
        Node::Group(group) => {
            if GroupPath::new(group_id).is_within(&group.id) {
                return None;
            }
            let segment = group.id.rsplit(PATH_SEPARATOR).next().unwrap_or(group.id.as_str());
            let new_id = if to_root {
                segment.to_string()
            } else {
                format!("{group_id}{PATH_SEPARATOR}{segment}")
            };
            let flat = state
                .flat
                .iter()
                .map(|l| match l.group.as_deref() {
                    Some(g) if filed_under(l, &group.id) => Layer {
                        group: Some(rebase(g, &group.id, &new_id)),
                        ..l.clone()
                    },
                    _ => l.clone(),
                })
                .collect();
            (Node::Group(rebase_group(group, &group.id, &new_id)), flat)
        }
        Node::Layer(id) => {
            if to_root {
                return None;
            }
            let flat = state
                .flat
                .iter()
                .map(|l| {
                    if l.id == *id {
                        Layer {
                            group: Some(group_id.to_string()),
                            ..l.clone()
                        }
                    } else {
                        l.clone()
                    }
                })
                .collect();
            (moving.clone(), flat)
        }
    };
    let detached = deep_remove(&state.groups, node_id);
    let groups = if to_root {
        let mut groups = detached;
        groups.insert(index.min(groups.len()), moved);
        groups
    } else {
        get_group(&detached, group_id).filter(|g| g.id == group_id)?;
        deep_update(&detached, group_id, &|g: &mut Group| {
            g.nodes.insert(index.min(g.nodes.len()), moved.clone());
        })
    };
    Some((reorder(&groups, &flat), groups))
}

/// Applies `action` to `state`, returning the next state.
///
/// Actions that cannot apply (unknown node, invalid order) leave the state
/// unchanged. Sorting here is unconditional; the filter and configuration
/// guards are enforced by the dispatcher.
pub fn reduce(state: LayersState, action: LayersAction) -> LayersState {
    match action {
        LayersAction::ToggleNode {
            node,
            node_type: NodeType::Group,
            status,
        } => LayersState {
            groups: deep_change(&state.groups, &node, &GroupChange::Expanded(status)),
            ..state
        },
        LayersAction::ToggleNode {
            node,
            node_type: NodeType::Layer,
            status,
        } => LayersState {
            flat: state
                .flat
                .iter()
                .map(|l| Layer {
                    expanded: if l.id == node { status } else { l.expanded },
                    ..l.clone()
                })
                .collect(),
            ..state
        },
        LayersAction::SortNode { node, order } => {
            match reorder_children(&state.groups, &node, &order) {
                Ok(groups) => LayersState {
                    flat: reorder(&groups, &state.flat),
                    groups,
                    ..state
                },
                Err(err) => {
                    tracing::debug!("sort ignored: {err}");
                    state
                }
            }
        }
        LayersAction::RemoveNode {
            node,
            node_type: NodeType::Group,
            ..
        } => {
            let (dropped, flat): (Vec<Layer>, Vec<Layer>) = state
                .flat
                .iter()
                .cloned()
                .partition(|l| filed_under(l, &node));
            let mut unselect: HashSet<String> = dropped.into_iter().map(|l| l.id).collect();
            if let Some(group) = get_group(&state.groups, &node) {
                unselect.extend(get_group_nodes(&group.nodes));
            }
            unselect.insert(node.clone());
            LayersState {
                flat,
                groups: deep_remove(&state.groups, &node),
                selected: without_ids(&state.selected, &unselect),
                ..state
            }
        }
        LayersAction::RemoveNode {
            node,
            node_type: NodeType::Layer,
            remove_empty,
        } => {
            let groups = deep_remove(&state.groups, &node);
            LayersState {
                groups: if remove_empty {
                    remove_empty_groups(&groups)
                } else {
                    groups
                },
                flat: state.flat.iter().filter(|l| l.id != node).cloned().collect(),
                selected: state.selected.iter().filter(|s| **s != node).cloned().collect(),
                ..state
            }
        }
        LayersAction::AddLayer { layer, foreground } => {
            let layer = normalize_layer(layer);
            let mut flat = state.flat.clone();
            flat.push(layer.clone());
            let groups = if layer.is_background() {
                state.groups.clone()
            } else {
                place_layer(&state.groups, &layer.id, layer.group_id(), foreground)
            };
            LayersState {
                flat: reorder(&groups, &flat),
                groups,
                ..state
            }
        }
        LayersAction::RemoveLayer { layer_id } => LayersState {
            groups: deep_remove(&state.groups, &layer_id),
            flat: state
                .flat
                .iter()
                .filter(|l| l.id != layer_id)
                .cloned()
                .collect(),
            ..state
        },
        LayersAction::AddGroup {
            title,
            parent,
            id,
            as_first,
            options,
        } => {
            if !is_valid_new_group_label(&title) {
                tracing::debug!("add group ignored: invalid label {title:?}");
                return state;
            }
            let parent = parent.unwrap_or_else(|| DEFAULT_GROUP_ID.to_string());
            let segment = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let mut groups = state.groups.clone();
            if !groups.iter().any(|n| n.as_group().is_some_and(|g| g.id == DEFAULT_GROUP_ID)) {
                groups.insert(0, default_group());
            }
            let group = Node::Group(Group {
                id: format!("{parent}.{segment}"),
                name: segment,
                title: Some(Title::Plain(title)),
                expanded: true,
                nodes: Vec::new(),
                extra: options,
            });
            LayersState {
                groups: insert_node(&groups, &group, Some(&parent), as_first),
                ..state
            }
        }
        LayersAction::ChangeGroupProperties { group, properties } => LayersState {
            flat: state
                .flat
                .iter()
                .map(|l| {
                    if l.belongs_to_group(&group) {
                        l.merged_with(&properties)
                    } else {
                        l.clone()
                    }
                })
                .collect(),
            ..state
        },
        LayersAction::ChangeLayerProperties { layers, properties } => {
            let targets_background = state
                .flat
                .iter()
                .any(|l| layers.contains(&l.id) && l.is_background());
            let shows = properties.get("visibility") == Some(&Value::Bool(true));
            LayersState {
                flat: state
                    .flat
                    .iter()
                    .map(|l| {
                        if layers.contains(&l.id) {
                            l.merged_with(&properties)
                        } else if targets_background && shows && l.is_background() {
                            // One visible background at a time.
                            Layer {
                                visibility: Some(false),
                                ..l.clone()
                            }
                        } else {
                            l.clone()
                        }
                    })
                    .collect(),
                ..state
            }
        }
        LayersAction::MoveNode {
            node,
            group_id,
            index,
        } => match move_node(&state, &node, &group_id, index) {
            Some((flat, groups)) => LayersState {
                flat,
                groups,
                ..state
            },
            None => {
                tracing::debug!("move of {node} into {group_id} ignored");
                state
            }
        },
        LayersAction::UpdateNode {
            node,
            node_type: NodeType::Layer,
            options,
        } => LayersState {
            flat: state
                .flat
                .iter()
                .map(|l| {
                    if l.id == node {
                        l.merged_with(&options)
                    } else {
                        l.clone()
                    }
                })
                .collect(),
            ..state
        },
        LayersAction::UpdateNode {
            node,
            node_type: NodeType::Group,
            options,
        } => LayersState {
            groups: deep_update(&state.groups, &node, &|g: &mut Group| {
                *g = g.merged_with(&options);
            }),
            ..state
        },
        LayersAction::SelectNode { id, ctrl_key } => LayersState {
            selected: select_nodes(&state.selected, &id, ctrl_key),
            ..state
        },
        LayersAction::FilterLayers { text } => LayersState {
            filter: text,
            ..state
        },
        LayersAction::ClearLayers => LayersState {
            flat: Vec::new(),
            groups: Vec::new(),
            selected: Vec::new(),
            ..state
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::split_layers;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state() -> LayersState {
        LayersState::from(split_layers(
            &[
                Layer::new("osm").in_group("background").with_visibility(true),
                Layer::new("sat").in_group("background").with_visibility(false),
                Layer::new("layer001").in_group("Default"),
                Layer::new("layer002").in_group("Default"),
                Layer::new("layer003").in_group("custom.nested001"),
                Layer::new("layer004").in_group("custom.nested001.nested002"),
            ],
            None,
        ))
    }

    fn ids(layers: &[Layer]) -> Vec<&str> {
        layers.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn toggle_group_and_layer() {
        let s = reduce(
            state(),
            LayersAction::ToggleNode {
                node: "custom.nested001".into(),
                node_type: NodeType::Group,
                status: false,
            },
        );
        assert!(!get_group(&s.groups, "custom.nested001").unwrap().expanded);
        assert!(get_group(&s.groups, "custom").unwrap().expanded);

        let s = reduce(
            s,
            LayersAction::ToggleNode {
                node: "layer001".into(),
                node_type: NodeType::Layer,
                status: true,
            },
        );
        assert!(s.layer("layer001").unwrap().expanded);
        assert!(!s.layer("layer002").unwrap().expanded);
    }

    #[test]
    fn sort_node_rederives_flat() {
        let s = reduce(
            state(),
            LayersAction::SortNode {
                node: "root".into(),
                order: vec![1, 0],
            },
        );
        assert_eq!(
            ids(&s.flat),
            vec!["osm", "sat", "layer003", "layer004", "layer001", "layer002"]
        );
        let unchanged = reduce(
            state(),
            LayersAction::SortNode {
                node: "root".into(),
                order: vec![5],
            },
        );
        assert_eq!(unchanged, state());
    }

    #[test]
    fn remove_group_drops_its_layers() {
        let mut s = state();
        s.selected = vec!["layer003".into(), "layer001".into()];
        let s = reduce(
            s,
            LayersAction::RemoveNode {
                node: "custom.nested001".into(),
                node_type: NodeType::Group,
                remove_empty: false,
            },
        );
        assert_eq!(ids(&s.flat), vec!["osm", "sat", "layer001", "layer002"]);
        assert_eq!(
            get_group_nodes(&s.groups),
            vec!["custom", "layer002", "layer001", "Default"]
        );
        assert_eq!(s.selected, vec!["layer001".to_string()]);
    }

    #[test]
    fn removing_default_keeps_ungrouped_layers() {
        let mut s = LayersState::from(split_layers(
            &[Layer::new("loose"), Layer::new("layer001").in_group("Default")],
            None,
        ));
        s.selected = vec!["loose".into(), "layer001".into()];
        let s = reduce(
            s,
            LayersAction::RemoveNode {
                node: "Default".into(),
                node_type: NodeType::Group,
                remove_empty: false,
            },
        );
        assert_eq!(ids(&s.flat), vec!["loose"]);
        assert!(get_group(&s.groups, "Default").is_none());
        assert_eq!(s.selected, Vec::<String>::new());
    }

    #[test]
    fn remove_layer_can_prune_empty_groups() {
        let s = reduce(
            state(),
            LayersAction::RemoveNode {
                node: "layer004".into(),
                node_type: NodeType::Layer,
                remove_empty: true,
            },
        );
        assert!(get_group(&s.groups, "custom.nested001.nested002").is_none());
        assert!(s.layer("layer004").is_none());

        let kept = reduce(
            state(),
            LayersAction::RemoveNode {
                node: "layer004".into(),
                node_type: NodeType::Layer,
                remove_empty: false,
            },
        );
        assert!(get_group(&kept.groups, "custom.nested001.nested002").is_some());
    }

    #[test]
    fn add_layer_lands_on_top_of_its_group() {
        let s = reduce(
            state(),
            LayersAction::AddLayer {
                layer: Layer::new("layer005").in_group("Default"),
                foreground: true,
            },
        );
        assert_eq!(
            ids(&s.flat),
            vec!["osm", "sat", "layer005", "layer001", "layer002", "layer003", "layer004"]
        );

        let s = reduce(
            s,
            LayersAction::AddLayer {
                layer: Layer::new("layer006").in_group("rivers.major"),
                foreground: true,
            },
        );
        assert_eq!(ids(&s.flat)[2], "layer006");
        assert!(get_group(&s.groups, "rivers.major").is_some());
    }

    #[test]
    fn add_background_layer_skips_the_tree() {
        let before = get_group_nodes(&state().groups);
        let s = reduce(
            state(),
            LayersAction::AddLayer {
                layer: Layer::new("topo").in_group("background"),
                foreground: true,
            },
        );
        assert_eq!(get_group_nodes(&s.groups), before);
        assert_eq!(&ids(&s.flat)[..3], &["osm", "sat", "topo"]);
    }

    #[test]
    fn add_group_goes_under_default() {
        let s = reduce(
            LayersState::default(),
            LayersAction::AddGroup {
                title: "My group".into(),
                parent: None,
                id: Some("g1".into()),
                as_first: false,
                options: Map::new(),
            },
        );
        let default = get_group(&s.groups, "Default").unwrap();
        let added = default.nodes[0].as_group().unwrap();
        assert_eq!(added.id, "Default.g1");
        assert_eq!(added.name, "g1");
        assert_eq!(added.title, Some(Title::from("My group")));

        let rejected = reduce(
            s.clone(),
            LayersAction::AddGroup {
                title: "a//b".into(),
                parent: None,
                id: None,
                as_first: true,
                options: Map::new(),
            },
        );
        assert_eq!(rejected, s);
    }

    #[test]
    fn change_group_properties_reaches_nested_layers() {
        let mut props = Map::new();
        props.insert("visibility".into(), json!(false));
        let s = reduce(
            state(),
            LayersAction::ChangeGroupProperties {
                group: "custom".into(),
                properties: props,
            },
        );
        assert_eq!(s.layer("layer003").unwrap().visibility, Some(false));
        assert_eq!(s.layer("layer004").unwrap().visibility, Some(false));
        assert_eq!(s.layer("layer001").unwrap().visibility, None);
    }

    #[test]
    fn showing_a_background_hides_the_others() {
        let mut props = Map::new();
        props.insert("visibility".into(), json!(true));
        let s = reduce(
            state(),
            LayersAction::ChangeLayerProperties {
                layers: vec!["sat".into()],
                properties: props,
            },
        );
        assert_eq!(s.layer("sat").unwrap().visibility, Some(true));
        assert_eq!(s.layer("osm").unwrap().visibility, Some(false));
    }

    #[test]
    fn move_group_rewrites_its_id_under_the_target() {
        let groups: Vec<Node> = serde_json::from_value(json!([
            {"id": "Default", "name": "Default", "title": "Default", "nodes": []},
            {"id": "groupid1", "name": "groupid1", "title": "Test Group", "nodes": [
                {"id": "groupid1.groupid2", "name": "groupid2", "title": "Group", "nodes": []}
            ]},
            {"id": "groupid3", "name": "groupid3", "title": "Group", "nodes": []}
        ]))
        .unwrap();
        let s = reduce(
            LayersState {
                groups,
                ..LayersState::default()
            },
            LayersAction::MoveNode {
                node: "groupid1.groupid2".into(),
                group_id: "Default".into(),
                index: 0,
            },
        );
        let expected: Vec<Node> = serde_json::from_value(json!([
            {"id": "Default", "name": "Default", "title": "Default", "nodes": [
                {"id": "Default.groupid2", "name": "groupid2", "title": "Group", "nodes": []}
            ]},
            {"id": "groupid1", "name": "groupid1", "title": "Test Group", "nodes": []},
            {"id": "groupid3", "name": "groupid3", "title": "Group", "nodes": []}
        ]))
        .unwrap();
        assert_eq!(s.groups, expected);
        assert!(s.flat.is_empty());
    }

    #[test]
    fn moved_group_carries_its_layers() {
        let s = reduce(
            state(),
            LayersAction::MoveNode {
                node: "custom.nested001".into(),
                group_id: "Default".into(),
                index: 0,
            },
        );
        assert_eq!(s.layer("layer003").unwrap().group.as_deref(), Some("Default.nested001"));
        assert_eq!(
            s.layer("layer004").unwrap().group.as_deref(),
            Some("Default.nested001.nested002")
        );
        assert!(get_group(&s.groups, "Default.nested001.nested002").is_some());
        assert!(get_group(&s.groups, "custom").unwrap().nodes.is_empty());
        let mut moved = ids(&s.flat);
        moved.sort();
        assert_eq!(
            moved,
            vec!["layer001", "layer002", "layer003", "layer004", "osm", "sat"]
        );
    }

    #[test]
    fn move_layer_changes_its_group() {
        let s = reduce(
            state(),
            LayersAction::MoveNode {
                node: "layer003".into(),
                group_id: "Default".into(),
                index: 0,
            },
        );
        assert_eq!(s.layer("layer003").unwrap().group.as_deref(), Some("Default"));
        assert_eq!(
            get_group(&s.groups, "Default").unwrap().nodes[0],
            Node::Layer("layer003".into())
        );
        assert!(
            !get_group_nodes(&get_group(&s.groups, "custom.nested001").unwrap().nodes)
                .contains(&"layer003".to_string())
        );
        assert_eq!(s.flat.len(), state().flat.len());
    }

    #[test]
    fn impossible_moves_leave_the_state_alone() {
        for (node, group_id) in [
            ("custom", "custom.nested001"),
            ("missing", "Default"),
            ("layer001", "nowhere"),
            ("layer001", "root"),
        ] {
            let s = reduce(
                state(),
                LayersAction::MoveNode {
                    node: node.into(),
                    group_id: group_id.into(),
                    index: 0,
                },
            );
            assert_eq!(s, state(), "{node} -> {group_id}");
        }
    }

    #[test]
    fn update_node_merges_options() {
        let mut options = Map::new();
        options.insert("opacity".into(), json!(0.3));
        let s = reduce(
            state(),
            LayersAction::UpdateNode {
                node: "layer001".into(),
                node_type: NodeType::Layer,
                options: options.clone(),
            },
        );
        assert_eq!(s.layer("layer001").unwrap().extra.get("opacity"), Some(&json!(0.3)));
        assert_eq!(s.layer("layer002"), state().layer("layer002"));

        options.insert("expanded".into(), json!(false));
        let s = reduce(
            s,
            LayersAction::UpdateNode {
                node: "custom.nested001".into(),
                node_type: NodeType::Group,
                options,
            },
        );
        let group = get_group(&s.groups, "custom.nested001").unwrap();
        assert!(!group.expanded);
        assert_eq!(group.extra.get("opacity"), Some(&json!(0.3)));
        assert_eq!(group.nodes.len(), 2);
    }

    #[test]
    fn actions_deserialize_from_tagged_json() {
        let action: LayersAction = serde_json::from_value(json!({
            "type": "SORT_NODE", "node": "Default", "order": [1, 0]
        }))
        .unwrap();
        assert_eq!(action.kind(), "sort_node");
        let action: LayersAction = serde_json::from_value(json!({
            "type": "TOGGLE_NODE", "node": "Default", "node_type": "groups", "status": true
        }))
        .unwrap();
        assert!(matches!(action, LayersAction::ToggleNode { node_type: NodeType::Group, .. }));
    }

    #[test]
    fn select_filter_and_clear() {
        let s = reduce(state(), LayersAction::SelectNode { id: "layer001".into(), ctrl_key: false });
        let s = reduce(s, LayersAction::SelectNode { id: "custom".into(), ctrl_key: true });
        assert_eq!(s.selected, vec!["layer001".to_string(), "custom".to_string()]);
        let s = reduce(s, LayersAction::FilterLayers { text: "roads".into() });
        assert_eq!(s.filter, "roads");
        let s = reduce(s, LayersAction::ClearLayers);
        assert!(s.flat.is_empty() && s.groups.is_empty() && s.selected.is_empty());
        assert_eq!(s.filter, "roads");
    }
}
