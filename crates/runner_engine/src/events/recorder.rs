//! Handler that keeps a copy of everything it receives

use super::{EventBus, EventKind, GameEvent, HandlerResult, Outbox, SharedHandler};
use std::cell::RefCell;
use std::rc::Rc;

/// Records delivered events in arrival order
#[derive(Debug, Default)]
pub struct EventRecorder {
    events: Vec<GameEvent>,
}

impl EventRecorder {
    /// Create a recorder and subscribe it to the given kinds
    pub fn attach(bus: &mut EventBus, kinds: &[EventKind]) -> Rc<RefCell<Self>> {
        let recorder = Rc::new(RefCell::new(Self::default()));
        let handler: SharedHandler = recorder.clone();
        bus.subscribe_all(kinds, &handler);
        recorder
    }

    /// Everything received so far
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Received events of one kind
    pub fn of_kind(&self, kind: EventKind) -> Vec<&GameEvent> {
        self.events.iter().filter(|event| event.kind() == kind).collect()
    }

    /// How many events of one kind arrived
    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|event| event.kind() == kind).count()
    }

    /// Forget everything recorded
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl super::EventHandler for EventRecorder {
    fn on_event(&mut self, event: &GameEvent, _outbox: &mut Outbox) -> HandlerResult {
        self.events.push(event.clone());
        Ok(())
    }
}
