//! In-memory registry of events with per-event locking
//!
//! Every event sits behind its own mutex, so starting one event never waits
//! on another, while two concurrent starts of the same event are serialized:
//! the second caller sees `AlreadyStarted` rather than racing on targets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use uuid::Uuid;

use super::{EventStatus, GiftExchangeEvent};
use crate::assignment::{AssignmentEngine, SearchStats};
use crate::error::EventError;

type SharedEvent = Arc<Mutex<GiftExchangeEvent>>;

/// Events indexed by id
#[derive(Default)]
pub struct EventRegistry {
    events: RwLock<HashMap<Uuid, SharedEvent>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event, replacing any event with the same id.
    pub fn insert(&self, event: GiftExchangeEvent) -> Uuid {
        let id = event.id;
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Arc::new(Mutex::new(event)));
        id
    }

    /// Snapshot of an event
    pub fn get(&self, id: Uuid) -> Result<GiftExchangeEvent, EventError> {
        self.with_event(id, |event| event.clone())
    }

    /// Run `f` with exclusive access to one event.
    ///
    /// Only that event is locked while `f` runs.
    pub fn with_event<F, R>(&self, id: Uuid, f: F) -> Result<R, EventError>
    where
        F: FnOnce(&mut GiftExchangeEvent) -> R,
    {
        let shared = self.shared(id)?;
        let mut event = shared.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut event))
    }

    /// Start an event, assigning every participant a target.
    pub fn start(
        &self,
        id: Uuid,
        engine: &mut AssignmentEngine,
    ) -> Result<SearchStats, EventError> {
        self.with_event(id, |event| event.start(engine))?
    }

    pub fn stop(&self, id: Uuid) -> Result<(), EventError> {
        self.with_event(id, |event| event.stop())?
    }

    /// Create and register the sequel of an event, returning its id.
    pub fn sequel(&self, id: Uuid) -> Result<Uuid, EventError> {
        let sequel = self.with_event(id, |event| event.sequel())?;
        Ok(self.insert(sequel))
    }

    /// `(id, display name, status)` for every event, ordered by creation time
    pub fn list(&self) -> Vec<(Uuid, String, EventStatus)> {
        let shared: Vec<SharedEvent> = self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut events: Vec<_> = shared
            .iter()
            .map(|event| {
                let event = event.lock().unwrap_or_else(PoisonError::into_inner);
                (event.created_at, event.id, event.display_name.clone(), event.status)
            })
            .collect();
        events.sort_by_key(|(created_at, id, _, _)| (*created_at, *id));
        events
            .into_iter()
            .map(|(_, id, name, status)| (id, name, status))
            .collect()
    }

    pub fn remove(&self, id: Uuid) -> Result<(), EventError> {
        self.events
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| ())
            .ok_or(EventError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn shared(&self, id: Uuid) -> Result<SharedEvent, EventError> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(EventError::NotFound(id))
    }
}
