use std::collections::HashMap;

use crate::model::Node;

/// Id index over a node tree.
///
/// Maps every group id, group name and leaf id to the child-index path of
/// its first occurrence in depth-first order, so lookups agree with
/// [`crate::lookup::get_node`] without rescanning the tree.
///
/// The index does not own the tree. It is only valid for the exact tree it
/// was built from; rebuild it after any edit.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    paths: HashMap<String, Vec<usize>>,
}

impl TreeIndex {
    pub fn build(nodes: &[Node]) -> Self {
        let mut index = Self::default();
        let mut path = Vec::new();
        index.visit(nodes, &mut path);
        index
    }

    fn visit(&mut self, nodes: &[Node], path: &mut Vec<usize>) {
        for (i, node) in nodes.iter().enumerate() {
            path.push(i);
            match node {
                Node::Layer(id) => self.record(id, path),
                Node::Group(group) => {
                    self.record(&group.name, path);
                    self.record(&group.id, path);
                    self.visit(&group.nodes, path);
                }
            }
            path.pop();
        }
    }

    fn record(&mut self, key: &str, path: &[usize]) {
        if !self.paths.contains_key(key) {
            self.paths.insert(key.to_string(), path.to_vec());
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.paths.contains_key(key)
    }

    pub fn path(&self, key: &str) -> Option<&[usize]> {
        self.paths.get(key).map(Vec::as_slice)
    }

    /// Resolves `key` in `nodes`, the tree this index was built from.
    pub fn get<'a>(&self, nodes: &'a [Node], key: &str) -> Option<&'a Node> {
        let path = self.paths.get(key)?;
        let (last, parents) = path.split_last()?;
        let mut level = nodes;
        for &i in parents {
            level = &level.get(i)?.as_group()?.nodes;
        }
        level.get(*last)
    }
}
