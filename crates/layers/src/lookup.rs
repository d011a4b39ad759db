//! Recursive lookups and copy-on-write edits over a node tree.
//!
//! Every function here is pure: edits return a new tree and misses are
//! reported as `None` or an empty result, never as an error.

use serde_json::Value;

use crate::model::{Group, Node, Title};

/// First node matching `key` in depth-first order.
///
/// A group matches by `id` or `name`, a leaf by its layer id. Each node is
/// tested before its own subtree, and a subtree before the next sibling.
pub fn get_node<'a>(nodes: &'a [Node], key: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.matches(key) {
            return Some(node);
        }
        if let Node::Group(group) = node
            && let Some(found) = get_node(&group.nodes, key)
        {
            return Some(found);
        }
    }
    None
}

/// Group with the given id or name anywhere in the tree.
pub fn get_group<'a>(nodes: &'a [Node], key: &str) -> Option<&'a Group> {
    get_node(nodes, key).and_then(Node::as_group)
}

/// Flattens `nodes` into ids, post-order.
///
/// Leaves are yielded as they come; a nested group yields its subtree
/// first and then its own id. Pass `&group.nodes` to flatten one group.
pub fn get_group_nodes(nodes: &[Node]) -> Vec<String> {
    let mut out = Vec::new();
    collect_group_nodes(nodes, &mut out);
    out
}

fn collect_group_nodes(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Layer(id) => out.push(id.clone()),
            Node::Group(group) => {
                collect_group_nodes(&group.nodes, out);
                out.push(group.id.clone());
            }
        }
    }
}

/// Layer ids under `nodes`, without the group ids.
pub fn layer_ids(nodes: &[Node]) -> Vec<&str> {
    nodes
        .iter()
        .flat_map(|node| match node {
            Node::Layer(id) => vec![id.as_str()],
            Node::Group(g) => layer_ids(&g.nodes),
        })
        .collect()
}

/// A single property edit applied to one group by [`deep_change`].
#[derive(Debug, Clone, PartialEq)]
pub enum GroupChange {
    Title(Title),
    Expanded(bool),
    Nodes(Vec<Node>),
    /// Metadata outside the typed attributes (`description`, `tooltipOptions`, ...).
    Property(String, Value),
}

impl GroupChange {
    pub fn apply(&self, group: &mut Group) {
        match self {
            GroupChange::Title(title) => group.title = Some(title.clone()),
            GroupChange::Expanded(expanded) => group.expanded = *expanded,
            GroupChange::Nodes(nodes) => group.nodes = nodes.clone(),
            GroupChange::Property(key, value) => {
                group.extra.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Returns a copy of `nodes` where the group with id `find_id` has `change` applied.
///
/// Only `id` is matched. An empty input yields an empty tree, and an id that
/// matches nothing yields an unchanged copy.
pub fn deep_change(nodes: &[Node], find_id: &str, change: &GroupChange) -> Vec<Node> {
    deep_update(nodes, find_id, &|group: &mut Group| change.apply(group))
}

/// Like [`deep_change`] with an arbitrary edit.
pub fn deep_update(nodes: &[Node], find_id: &str, edit: &dyn Fn(&mut Group)) -> Vec<Node> {
    nodes
        .iter()
        .map(|node| match node {
            Node::Group(group) if group.id == find_id => {
                let mut changed = group.clone();
                edit(&mut changed);
                Node::Group(changed)
            }
            Node::Group(group) => Node::Group(Group {
                nodes: deep_update(&group.nodes, find_id, edit),
                ..group.clone()
            }),
            Node::Layer(_) => node.clone(),
        })
        .collect()
}

/// Removes every node whose id is `id`, at any depth.
pub fn deep_remove(nodes: &[Node], id: &str) -> Vec<Node> {
    nodes
        .iter()
        .filter(|node| node.id() != id)
        .map(|node| match node {
            Node::Group(group) => Node::Group(Group {
                nodes: deep_remove(&group.nodes, id),
                ..group.clone()
            }),
            Node::Layer(_) => node.clone(),
        })
        .collect()
}

/// Drops groups whose subtree holds no layer.
pub fn remove_empty_groups(nodes: &[Node]) -> Vec<Node> {
    nodes
        .iter()
        .filter_map(|node| match node {
            Node::Group(group) => non_empty_group(group).map(Node::Group),
            Node::Layer(_) => Some(node.clone()),
        })
        .collect()
}

fn non_empty_group(group: &Group) -> Option<Group> {
    let nodes = remove_empty_groups(&group.nodes);
    if nodes.is_empty() {
        return None;
    }
    Some(Group {
        nodes,
        ..group.clone()
    })
}

/// First group named `name`, checking a whole level before descending.
pub fn get_group_by_name<'a>(name: &str, nodes: &'a [Node]) -> Option<&'a Group> {
    let groups = || nodes.iter().filter_map(Node::as_group);
    groups()
        .find(|g| g.name == name)
        .or_else(|| groups().find_map(|g| get_group_by_name(name, &g.nodes)))
}

/// Title of the group with id `id`, wherever it sits.
pub fn nested_group_title<'a>(id: &str, groups: &'a [Node]) -> Option<&'a Title> {
    get_group(groups, id)
        .filter(|g| g.id == id)
        .and_then(|g| g.title.as_ref())
}
