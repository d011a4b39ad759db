use serde::{Deserialize, Serialize};

use crate::index::TreeIndex;
use crate::model::{Group, Layer, Node};

/// Which collection a TOC node lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "layers")]
    Layer,
    #[serde(rename = "groups")]
    Group,
}

/// A resolved selection entry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SelectedNode<'a> {
    Layer(&'a Layer),
    Group(&'a Group),
}

impl<'a> SelectedNode<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            SelectedNode::Layer(l) => &l.id,
            SelectedNode::Group(g) => &g.id,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            SelectedNode::Layer(_) => NodeType::Layer,
            SelectedNode::Group(_) => NodeType::Group,
        }
    }
}

/// Resolves selected ids against the flat layers first, then the tree.
///
/// Ids that resolve to neither are dropped.
pub fn selected_nodes_ids_to_object<'a>(
    ids: &[String],
    layers: &'a [Layer],
    tree: &'a [Node],
) -> Vec<SelectedNode<'a>> {
    let index = TreeIndex::build(tree);
    ids.iter()
        .filter_map(|id| {
            if let Some(layer) = layers.iter().find(|l| &l.id == id) {
                return Some(SelectedNode::Layer(layer));
            }
            index
                .get(tree, id)
                .and_then(Node::as_group)
                .filter(|g| &g.id == id)
                .map(SelectedNode::Group)
        })
        .collect()
}

/// Next selection after clicking `id`.
///
/// With `ctrl_key` the id is toggled in the current selection. Without it the
/// selection becomes just `id`, or empty when `id` was the only selected node.
pub fn select_nodes(selected: &[String], id: &str, ctrl_key: bool) -> Vec<String> {
    if id.is_empty() {
        return Vec::new();
    }
    let already = selected.iter().any(|s| s == id);
    if ctrl_key {
        if already {
            return selected.iter().filter(|s| *s != id).cloned().collect();
        }
        let mut next = selected.to_vec();
        next.push(id.to_string());
        return next;
    }
    if already && selected.len() == 1 {
        return Vec::new();
    }
    vec![id.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::tests::nested_groups;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn layers_win_over_groups_and_misses_drop() {
        let tree = nested_groups();
        let layers = vec![Layer::new("layer001"), Layer::new("custom")];
        let selected = selected_nodes_ids_to_object(
            &ids(&["custom", "custom.nested001", "nope", "layer001"]),
            &layers,
            &tree,
        );
        let got: Vec<_> = selected.iter().map(|s| (s.id(), s.node_type())).collect();
        assert_eq!(
            got,
            vec![
                ("custom", NodeType::Layer),
                ("custom.nested001", NodeType::Group),
                ("layer001", NodeType::Layer),
            ]
        );
    }

    #[test]
    fn tree_leaves_are_not_groups() {
        let tree = nested_groups();
        let selected = selected_nodes_ids_to_object(&ids(&["layer003"]), &[], &tree);
        assert!(selected.is_empty());
    }

    #[test]
    fn click_selection_rules() {
        assert_eq!(select_nodes(&[], "a", false), ids(&["a"]));
        assert_eq!(select_nodes(&ids(&["a"]), "a", false), ids(&[]));
        assert_eq!(select_nodes(&ids(&["a", "b"]), "a", false), ids(&["a"]));
        assert_eq!(select_nodes(&ids(&["a"]), "b", true), ids(&["a", "b"]));
        assert_eq!(select_nodes(&ids(&["a", "b"]), "a", true), ids(&["b"]));
        assert_eq!(select_nodes(&ids(&["a"]), "", true), ids(&[]));
    }

    #[test]
    fn node_type_uses_collection_names() {
        assert_eq!(serde_json::to_string(&NodeType::Layer).unwrap(), "\"layers\"");
        assert_eq!(
            serde_json::from_str::<NodeType>("\"groups\"").unwrap(),
            NodeType::Group
        );
    }
}
