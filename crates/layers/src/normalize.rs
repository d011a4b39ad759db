use foundation::DEFAULT_GROUP_ID;

use crate::model::{GroupOverride, Layer, MapConfig, MapLayers};

/// Copies `layers` stamping each with its position as `storeIndex`.
pub fn index_layers(layers: &[Layer]) -> Vec<Layer> {
    layers
        .iter()
        .enumerate()
        .map(|(i, layer)| Layer {
            store_index: Some(i),
            ..layer.clone()
        })
        .collect()
}

/// Id of `layer`, generating one when missing.
///
/// Generated ids are `name__<n>` where `n` is `existing_len` when given
/// (legacy positional ids) and a random token otherwise.
pub fn layer_id(layer: &Layer, existing_len: Option<usize>) -> String {
    if !layer.id.is_empty() {
        return layer.id.clone();
    }
    let name = layer.name.as_deref().unwrap_or("layer");
    match existing_len {
        Some(n) => format!("{name}__{n}"),
        None => format!("{name}__{}", uuid::Uuid::new_v4().simple()),
    }
}

/// Fills missing ids with their positional form (`name__<index>`).
///
/// Positional ids keep repeated splits of the same list stable.
pub fn normalize_layers(layers: &[Layer]) -> Vec<Layer> {
    layers
        .iter()
        .enumerate()
        .map(|(i, layer)| Layer {
            id: layer_id(layer, Some(i)),
            ..layer.clone()
        })
        .collect()
}

pub fn normalize_layer(layer: Layer) -> Layer {
    if !layer.id.is_empty() {
        return layer;
    }
    Layer {
        id: layer_id(&layer, None),
        ..layer
    }
}

/// Gives every layer an id and installs the default group override when
/// the map carries none.
pub fn normalize_map(map: MapConfig) -> MapConfig {
    let layers = match map.layers {
        MapLayers::Flat(layers) if layers.iter().any(|l| l.id.is_empty()) => {
            MapLayers::Flat(layers.into_iter().map(normalize_layer).collect())
        }
        other => other,
    };
    let groups = map
        .groups
        .or_else(|| Some(vec![GroupOverride::new(DEFAULT_GROUP_ID, true)]));
    MapConfig {
        layers,
        groups,
        extra: map.extra,
    }
}
