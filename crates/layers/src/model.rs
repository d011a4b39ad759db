use std::collections::BTreeMap;

use foundation::{GroupPath, group_or_default, is_background};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A leaf of the table of contents: one map layer.
///
/// Only the attributes the tree engine reads are modelled. Everything else a
/// renderer attaches (type, url, style, ...) is kept verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Dot-delimited ancestry, e.g. `continent.country`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<bool>,
    /// Position in the originally loaded layer list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_index: Option<usize>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub expanded: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Layer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visibility = Some(visible);
        self
    }

    /// Group id this layer is filed under (`Default` when unset).
    pub fn group_id(&self) -> &str {
        group_or_default(self.group.as_deref())
    }

    pub fn is_background(&self) -> bool {
        is_background(self.group.as_deref())
    }

    /// Absent visibility counts as visible.
    pub fn is_visible(&self) -> bool {
        self.visibility != Some(false)
    }

    /// True if the layer sits in `group_id` or any group nested below it.
    pub fn belongs_to_group(&self, group_id: &str) -> bool {
        GroupPath::new(self.group_id()).is_within(group_id)
    }

    /// Returns a copy with `properties` merged over the current attributes.
    ///
    /// Properties that do not fit the typed attributes leave the layer untouched.
    pub fn merged_with(&self, properties: &Map<String, Value>) -> Self {
        merge_fields(self, properties).unwrap_or_else(|err| {
            tracing::warn!("ignoring properties for layer {}: {err}", self.id);
            self.clone()
        })
    }
}

fn merge_fields<T>(value: &T, properties: &Map<String, Value>) -> Result<T, serde_json::Error>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    let mut fields = match serde_json::to_value(value)? {
        Value::Object(fields) => fields,
        other => return serde_json::from_value(other),
    };
    for (k, v) in properties {
        fields.insert(k.clone(), v.clone());
    }
    serde_json::from_value(Value::Object(fields))
}

/// Display title of a group: plain text or a locale-keyed map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Title {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl Title {
    /// Text for `locale`, falling back to the `default` entry.
    pub fn text(&self, locale: Option<&str>) -> Option<&str> {
        match self {
            Title::Plain(s) => Some(s.as_str()),
            Title::Localized(map) => locale
                .and_then(|l| map.get(l))
                .or_else(|| map.get("default"))
                .or_else(|| map.values().next())
                .map(String::as_str),
        }
    }
}

impl From<&str> for Title {
    fn from(s: &str) -> Self {
        Title::Plain(s.to_string())
    }
}

impl From<String> for Title {
    fn from(s: String) -> Self {
        Title::Plain(s)
    }
}

/// An internal node of the tree.
///
/// `nodes[0]` is the visual bottom of the group, the last entry its top.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Full dotted path, e.g. `custom.nested001`.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<Node>) -> Self {
        self.nodes = nodes;
        self
    }

    /// Returns a copy with `properties` merged over the group's fields.
    pub fn merged_with(&self, properties: &Map<String, Value>) -> Self {
        merge_fields(self, properties).unwrap_or_else(|err| {
            tracing::warn!("ignoring properties for group {}: {err}", self.id);
            self.clone()
        })
    }
}

/// Entry of a group's `nodes`: a layer id or a nested group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Layer(String),
    Group(Group),
}

impl Node {
    pub fn layer(id: impl Into<String>) -> Self {
        Node::Layer(id.into())
    }

    pub fn id(&self) -> &str {
        match self {
            Node::Layer(id) => id,
            Node::Group(g) => &g.id,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Node::Group(g) => Some(g),
            Node::Layer(_) => None,
        }
    }

    /// Lookup key match: a leaf by its id, a group by id or name.
    pub fn matches(&self, key: &str) -> bool {
        match self {
            Node::Layer(id) => id == key,
            Node::Group(g) => g.name == key || g.id == key,
        }
    }
}

impl From<Group> for Node {
    fn from(g: Group) -> Self {
        Node::Group(g)
    }
}

/// Saved per-group metadata applied after synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupOverride {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(default)]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_placement: Option<Value>,
}

impl GroupOverride {
    pub fn new(id: impl Into<String>, expanded: bool) -> Self {
        Self {
            id: id.into(),
            expanded,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<Title>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Normalized `{flat, groups}` pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitLayers {
    /// Paint order, index 0 topmost.
    pub flat: Vec<Layer>,
    pub groups: Vec<Node>,
}

/// The `layers` entry of a map configuration, before or after splitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapLayers {
    Flat(Vec<Layer>),
    Split(SplitLayers),
}

impl Default for MapLayers {
    fn default() -> Self {
        MapLayers::Flat(Vec::new())
    }
}

/// Map configuration as loaded from (or saved to) a config document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub layers: MapLayers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<GroupOverride>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MapConfig {
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self {
            layers: MapLayers::Flat(layers),
            ..Self::default()
        }
    }

    pub fn with_groups(mut self, groups: Vec<GroupOverride>) -> Self {
        self.groups = Some(groups);
        self
    }
}
