/// Record of one dispatched action.
///
/// Kept as structured text; `kind` is the action's stable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Events kept by [`EventBus::new`] before the oldest are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Bounded event log; once full, each emit drops the oldest event.
#[derive(Debug)]
pub struct EventBus {
    next_seq: u64,
    capacity: usize,
    events: Vec<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            next_seq: 0,
            capacity: capacity.max(1),
            events: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            seq,
            kind,
            message: message.into(),
        });
        if self.events.len() > self.capacity {
            let excess = self.events.len() - self.capacity;
            self.events.drain(..excess);
        }
        seq
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Takes the recorded events; sequence numbers keep counting.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;

    #[test]
    fn sequence_numbers_increase() {
        let mut bus = EventBus::new();
        assert_eq!(bus.emit("a", "one"), 0);
        assert_eq!(bus.emit("b", "two"), 1);
        assert_eq!(bus.events()[1].kind, "b");
    }

    #[test]
    fn full_bus_drops_the_oldest_events() {
        let mut bus = EventBus::with_capacity(2);
        for i in 0..5 {
            bus.emit("k", format!("m{i}"));
        }
        let kept: Vec<_> = bus.events().iter().map(|e| (e.seq, e.message.as_str())).collect();
        assert_eq!(kept, vec![(3, "m3"), (4, "m4")]);
        assert_eq!(EventBus::new().capacity(), super::DEFAULT_EVENT_CAPACITY);
    }

    #[test]
    fn drain_clears_events_but_not_the_counter() {
        let mut bus = EventBus::new();
        bus.emit("k", "m");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
        assert_eq!(bus.emit("k", "m"), 1);
    }
}
