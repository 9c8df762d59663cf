//! Synchronous emitter fanning events out to registered callbacks

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::types::{Event, EventKind, EventPayload};

/// Subscriber callback. Two registrations are the same callback when they
/// share an allocation (`Arc::ptr_eq`).
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

type SubscriptionTable = HashMap<EventKind, Vec<EventCallback>>;

/// Registry and dispatcher for named events
///
/// Cloning is cheap and every clone shares one subscription table, so a
/// single emitter built at startup can be handed to each component.
#[derive(Clone, Default)]
pub struct Emitter {
    subscriptions: Arc<RwLock<SubscriptionTable>>,
    /// Number of events emitted (for monitoring)
    event_count: Arc<AtomicUsize>,
}

impl Emitter {
    /// Create an emitter with an empty subscription table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `kind`
    ///
    /// Callbacks run in registration order. Registering the same callback
    /// twice makes it run twice per emission.
    pub fn on(&self, kind: EventKind, callback: EventCallback) {
        let mut table = self.write_table();
        let callbacks = table.entry(kind).or_default();
        callbacks.push(callback);
        debug!(kind = %kind, subscribers = callbacks.len(), "Subscribed");
    }

    /// Register a callback that receives only the payload of `P`'s kind
    ///
    /// Returns the registered callback, which is the handle to pass to [`Emitter::off`].
    pub fn on_payload<P, F>(&self, f: F) -> EventCallback
    where
        P: EventPayload,
        F: Fn(&P) + Send + Sync + 'static,
    {
        let callback: EventCallback = Arc::new(move |event: &Event| {
            if let Some(data) = P::from_event(event) {
                f(data);
            }
        });
        self.on(P::KIND, callback.clone());
        callback
    }

    /// Remove one registration of `callback` for `kind`
    ///
    /// Only the earliest occurrence is removed. Unknown kinds and callbacks
    /// that were never registered are ignored.
    pub fn off(&self, kind: EventKind, callback: &EventCallback) {
        let mut table = self.write_table();
        let Some(callbacks) = table.get_mut(&kind) else {
            trace!(kind = %kind, "Unsubscribe for kind without subscribers");
            return;
        };

        match callbacks.iter().position(|cb| Arc::ptr_eq(cb, callback)) {
            Some(index) => {
                callbacks.remove(index);
                let remaining = callbacks.len();
                if remaining == 0 {
                    table.remove(&kind);
                }
                debug!(kind = %kind, subscribers = remaining, "Unsubscribed");
            }
            None => trace!(kind = %kind, "Unsubscribe for unregistered callback"),
        }
    }

    /// Deliver `event` to every callback registered for its kind
    ///
    /// The subscriber list is copied before the first callback runs, so
    /// callbacks that call `on` or `off` only change later emissions. A
    /// callback that re-emits the kind it is handling recurses.
    ///
    /// Returns the number of callbacks invoked; 0 when nobody is subscribed.
    pub fn emit(&self, event: &Event) -> usize {
        self.event_count.fetch_add(1, Ordering::Relaxed);
        let kind = event.kind();

        let snapshot: Vec<EventCallback> = match self.read_table().get(&kind) {
            Some(callbacks) => callbacks.clone(),
            None => {
                trace!(kind = %kind, "No subscribers, event dropped");
                return 0;
            }
        };

        trace!(kind = %kind, recipients = snapshot.len(), "Emitting event");
        for callback in &snapshot {
            callback(event);
        }
        snapshot.len()
    }

    /// Drop every callback registered for `kind`
    pub fn clear(&self, kind: EventKind) {
        if let Some(callbacks) = self.write_table().remove(&kind) {
            debug!(kind = %kind, removed = callbacks.len(), "Cleared subscribers");
        }
    }

    /// Get the number of callbacks registered for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.read_table().get(&kind).map_or(0, Vec::len)
    }

    /// Whether any callback is registered for `kind`
    pub fn has_subscribers(&self, kind: EventKind) -> bool {
        self.subscriber_count(kind) > 0
    }

    /// Get the total number of events emitted
    pub fn event_count(&self) -> usize {
        self.event_count.load(Ordering::Relaxed)
    }

    // No lock is held while callbacks run, so a poisoned table is never
    // half-updated and can be used as is.
    fn read_table(&self) -> std::sync::RwLockReadGuard<'_, SubscriptionTable> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_table(&self) -> std::sync::RwLockWriteGuard<'_, SubscriptionTable> {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers: HashMap<EventKind, usize> = self
            .read_table()
            .iter()
            .map(|(kind, callbacks)| (*kind, callbacks.len()))
            .collect();

        f.debug_struct("Emitter")
            .field("subscribers", &subscribers)
            .field("event_count", &self.event_count())
            .finish()
    }
}
