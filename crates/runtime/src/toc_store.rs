use layers::{LayersAction, LayersState, MapConfig, TocSettings, reduce, save_map, split_of};

use crate::event_bus::{Event, EventBus};

/// Outcome of [`TocStore::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// Refused before reaching the reducer.
    Ignored(&'static str),
}

/// Owns the TOC state and applies actions one at a time.
///
/// Every dispatch is logged to a bounded [`EventBus`]; callers that want the
/// full history take it with [`TocStore::drain_events`] once per frame.
#[derive(Debug, Default)]
pub struct TocStore {
    state: LayersState,
    settings: TocSettings,
    bus: EventBus,
}

impl TocStore {
    pub fn new(state: LayersState, settings: TocSettings) -> Self {
        Self::with_bus(state, settings, EventBus::new())
    }

    pub fn with_bus(state: LayersState, settings: TocSettings, bus: EventBus) -> Self {
        let state = LayersState {
            filter: settings.filter_text.clone(),
            ..state
        };
        Self {
            state,
            settings,
            bus,
        }
    }

    /// Loads a map configuration, splitting it when it is still flat.
    pub fn from_map(map: &MapConfig, settings: TocSettings) -> Self {
        Self::new(LayersState::from(split_of(map)), settings)
    }

    pub fn state(&self) -> &LayersState {
        &self.state
    }

    pub fn settings(&self) -> &TocSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: TocSettings) {
        self.state.filter = settings.filter_text.clone();
        self.settings = settings;
    }

    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    pub fn dispatch(&mut self, action: LayersAction) -> Dispatch {
        let kind = action.kind();
        if matches!(action, LayersAction::SortNode { .. }) && !self.settings.sorting_enabled() {
            let reason = if self.settings.activate_sort_layer {
                "filter active"
            } else {
                "sorting disabled"
            };
            tracing::debug!("{kind} ignored: {reason}");
            self.bus.emit(kind, format!("ignored: {reason}"));
            return Dispatch::Ignored(reason);
        }
        if let LayersAction::FilterLayers { text } = &action {
            self.settings.filter_text = text.clone();
        }
        let message = describe(&action);
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        self.bus.emit(kind, message);
        Dispatch::Applied
    }

    /// Map configuration for the current state.
    pub fn save(&self) -> MapConfig {
        save_map(&self.state)
    }
}

fn describe(action: &LayersAction) -> String {
    match action {
        LayersAction::ToggleNode { node, status, .. } => format!("{node} expanded={status}"),
        LayersAction::SortNode { node, order } => format!("{node} order={order:?}"),
        LayersAction::RemoveNode { node, .. } => node.clone(),
        LayersAction::AddLayer { layer, .. } => layer.id.clone(),
        LayersAction::RemoveLayer { layer_id } => layer_id.clone(),
        LayersAction::AddGroup { title, parent, .. } => {
            format!("{title} under {}", parent.as_deref().unwrap_or("Default"))
        }
        LayersAction::ChangeGroupProperties { group, .. } => group.clone(),
        LayersAction::ChangeLayerProperties { layers, .. } => layers.join(","),
        LayersAction::MoveNode {
            node,
            group_id,
            index,
        } => format!("{node} into {group_id} at {index}"),
        LayersAction::UpdateNode { node, .. } => node.clone(),
        LayersAction::SelectNode { id, .. } => id.clone(),
        LayersAction::FilterLayers { text } => text.clone(),
        LayersAction::ClearLayers => String::new(),
    }
}
