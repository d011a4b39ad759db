use std::collections::HashSet;

use foundation::{GroupPath, unescape_segment};

use crate::model::{Group, Layer, Node, Title};

/// Ids of the layers filed directly under `group_id`, reversed.
///
/// The list is reversed so the first layer in flat order ends up at the top
/// of the group, i.e. at the end of its `nodes`.
fn direct_layer_ids(group_id: &str, layers: &[Layer]) -> Vec<Node> {
    layers
        .iter()
        .filter(|l| l.group_id() == group_id)
        .rev()
        .map(|l| Node::Layer(l.id.clone()))
        .collect()
}

/// Builds a group node for the path prefix `id` whose last segment is `segment`.
///
/// With `add_layers`, the group is seeded with the layers filed directly under it.
pub fn create_group(id: &str, segment: &str, layers: &[Layer], add_layers: bool) -> Group {
    let label = unescape_segment(segment);
    Group {
        id: id.to_string(),
        name: label.clone(),
        title: Some(Title::Plain(label)),
        expanded: true,
        nodes: if add_layers {
            direct_layer_ids(id, layers)
        } else {
            Vec::new()
        },
        extra: Default::default(),
    }
}

/// Distinct group paths in first-seen order, background excluded, reversed.
fn group_paths(layers: &[Layer]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut paths: Vec<&str> = layers
        .iter()
        .filter(|l| !l.is_background())
        .map(Layer::group_id)
        .filter(|g| seen.insert(*g))
        .collect();
    paths.reverse();
    paths
}

/// Synthesizes the group tree from the `group` paths of a flat layer list.
///
/// Intermediate groups are created on demand. A path reached again later
/// (because a deeper path created it first) gets its direct layers appended
/// after the nested groups already there. Background layers never enter
/// the tree.
pub fn get_layers_by_group(layers: &[Layer]) -> Vec<Node> {
    let mut groups: Vec<Node> = Vec::new();
    for path in group_paths(layers) {
        let path = GroupPath::new(path);
        let depth = path.depth();
        let mut level = &mut groups;
        for (i, (id, segment)) in path.prefixes().enumerate() {
            let deepest = i + 1 == depth;
            let existing = level
                .iter()
                .position(|n| matches!(n, Node::Group(g) if g.id == id));
            let pos = match existing {
                Some(pos) => {
                    if deepest && let Node::Group(group) = &mut level[pos] {
                        group.nodes.extend(direct_layer_ids(id, layers));
                    }
                    pos
                }
                None => {
                    level.push(Node::Group(create_group(id, segment, layers, deepest)));
                    level.len() - 1
                }
            };
            let Node::Group(group) = &mut level[pos] else {
                break;
            };
            level = &mut group.nodes;
        }
    }
    groups
}

/// Files `layer_id` under `group_path`, creating any missing group on the way.
///
/// `foreground` puts the layer (and any group created for it) on top of its
/// siblings, i.e. at the end of the parent's `nodes`; otherwise at the bottom.
pub fn place_layer(groups: &[Node], layer_id: &str, group_path: &str, foreground: bool) -> Vec<Node> {
    let mut groups = groups.to_vec();
    let path = GroupPath::new(group_path);
    place_in(&mut groups, &mut path.prefixes(), layer_id, foreground);
    groups
}

fn place_in<'p>(
    level: &mut Vec<Node>,
    prefixes: &mut impl Iterator<Item = (&'p str, &'p str)>,
    layer_id: &str,
    foreground: bool,
) {
    let Some((id, segment)) = prefixes.next() else {
        insert_at(level, Node::Layer(layer_id.to_string()), foreground);
        return;
    };
    let existing = level
        .iter()
        .position(|n| matches!(n, Node::Group(g) if g.id == id));
    let pos = match existing {
        Some(pos) => pos,
        None => insert_at(level, Node::Group(create_group(id, segment, &[], false)), foreground),
    };
    if let Node::Group(group) = &mut level[pos] {
        place_in(&mut group.nodes, prefixes, layer_id, foreground);
    }
}

fn insert_at(level: &mut Vec<Node>, node: Node, on_top: bool) -> usize {
    if on_top {
        level.push(node);
        level.len() - 1
    } else {
        level.insert(0, node);
        0
    }
}
