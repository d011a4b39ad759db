//! Helpers behind the `toc` binary: input parsing and text rendering.

use std::fmt::Write as _;
use std::fs;
use std::io::Read as _;
use std::path::Path;

use foundation::BACKGROUND_GROUP_ID;
use layers::{Layer, MapConfig, Node, SplitLayers};
use serde::Serialize;

/// Reads a map configuration from `path`, or from stdin for `-`.
pub fn read_map(path: &Path) -> Result<MapConfig, String> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("read stdin: {e}"))?;
        buf
    } else {
        fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?
    };
    serde_json::from_str(&raw).map_err(|e| format!("parse {path:?}: {e}"))
}

/// Parses `2,0,1` into a child order.
pub fn parse_order(text: &str) -> Result<Vec<usize>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .map_err(|e| format!("invalid order entry {s:?}: {e}"))
        })
        .collect()
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.map_err(|e| format!("serialize: {e}"))
}

fn layer_line(id: &str, flat: &[Layer]) -> String {
    match flat.iter().find(|l| l.id == id) {
        Some(layer) if !layer.is_visible() => format!("{id} (hidden)"),
        Some(_) => id.to_string(),
        None => format!("{id} (missing)"),
    }
}

fn render_nodes(nodes: &[Node], flat: &[Layer], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for node in nodes.iter().rev() {
        match node {
            Node::Layer(id) => {
                let _ = writeln!(out, "{indent}- {}", layer_line(id, flat));
            }
            Node::Group(group) => {
                let label = group
                    .title
                    .as_ref()
                    .and_then(|t| t.text(None))
                    .unwrap_or(&group.name);
                let marker = if group.expanded { "v" } else { ">" };
                let _ = writeln!(out, "{indent}{marker} {label} [{}]", group.id);
                render_nodes(&group.nodes, flat, depth + 1, out);
            }
        }
    }
}

/// Renders the TOC as indented text, topmost node first.
///
/// Background layers are listed last under their own heading.
pub fn render_tree(split: &SplitLayers) -> String {
    let mut out = String::new();
    render_nodes(&split.groups, &split.flat, 0, &mut out);
    let backgrounds: Vec<&Layer> = split.flat.iter().filter(|l| l.is_background()).collect();
    if !backgrounds.is_empty() {
        let _ = writeln!(out, "= {BACKGROUND_GROUP_ID}");
        for layer in backgrounds.iter().rev() {
            let _ = writeln!(out, "  - {}", layer_line(&layer.id, &split.flat));
        }
    }
    out
}
