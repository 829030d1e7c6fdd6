/// Host-facing engine events.
///
/// Presenters report outcomes by pushing events; the host drains the
/// queue once per loop iteration. The queue is internally locked so
/// presenters can push through a shared reference.

use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// An action finished and released its resources
    ActionEnded { object_id: u32 },
    /// A control changed its selected state in response to input
    ControlClicked { object_id: u32, selected: i16 },
    /// A control asked the host to start a scripted action
    ActionRequested { script: String },
    /// A media stream ran out of chunks
    StreamEnded { object_id: u32 },
}

#[derive(Default)]
pub struct EventQueue {
    events: Mutex<Vec<EngineEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }

    pub fn push(&self, event: EngineEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&self) -> Vec<EngineEvent> {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        std::mem::take(&mut *events)
    }

    pub fn is_empty(&self) -> bool {
        match self.events.lock() {
            Ok(events) => events.is_empty(),
            Err(poisoned) => poisoned.into_inner().is_empty(),
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
