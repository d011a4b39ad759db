//! Table-of-contents model: flat layers, the synthesized group tree, and the
//! transforms between them.

pub mod error;
pub mod index;
pub mod lookup;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod reducer;
pub mod reorder;
pub mod selection;
pub mod sort;
pub mod split;
pub mod synthesis;

pub use error::TocError;
pub use index::TreeIndex;
pub use lookup::{
    GroupChange, deep_change, deep_remove, deep_update, get_group, get_group_by_name,
    get_group_nodes, get_node, layer_ids, nested_group_title, remove_empty_groups,
};
pub use model::{Group, GroupOverride, Layer, MapConfig, MapLayers, Node, SplitLayers, Title};
pub use normalize::{index_layers, layer_id, normalize_layer, normalize_map};
pub use persist::{group_overrides, save_map};
pub use reducer::{LayersAction, LayersState, reduce};
pub use reorder::{reorder, reorder_layers, reorder_strict, sort_layers};
pub use selection::{NodeType, SelectedNode, select_nodes, selected_nodes_ids_to_object};
pub use sort::{SortOutcome, TocSettings, reorder_children, sort_node, validate_order};
pub use split::{
    Denormalized, DenormalizedGroup, DenormalizedNode, apply_group_overrides,
    denormalize_groups, split_layers, split_map_and_layers, split_of,
};
pub use synthesis::{create_group, get_layers_by_group, place_layer};
