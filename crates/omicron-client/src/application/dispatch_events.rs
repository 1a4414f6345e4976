//! DispatchEvents: fans drained event batches out to registered listeners.
//!
//! The original engine broadcast every decoded event to "every scene object
//! tagged as a listener". This module replaces that with an explicit
//! subscriber list: a consumer registers [`EventListener`]s, then calls
//! [`EventDispatcher::pump`] once per tick to drain the queue and deliver
//! the batch. Dispatch stays on the consumer's thread; nothing here touches
//! the network path.

use std::sync::Arc;

use omicron_core::{Event, EventQueue, ServiceType};
use tracing::{debug, info};

/// A consumer of decoded events.
///
/// `handles` lets a listener opt out of event classes cheaply before
/// delivery; the default accepts everything.
pub trait EventListener: Send {
    /// Returns `true` if this listener wants `event` delivered.
    fn handles(&self, event: &Event) -> bool {
        let _ = event;
        true
    }

    /// Delivers one event. Called on the consumer's tick, in arrival order.
    fn on_event(&mut self, event: &Event);
}

/// Registry of listeners plus the drain-and-deliver consumer tick.
pub struct EventDispatcher {
    listeners: Vec<Box<dyn EventListener>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers a listener. Listeners are invoked in registration order.
    pub fn register(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers each event in `batch` to every listener that handles it.
    pub fn dispatch(&mut self, batch: &[Event]) {
        for event in batch {
            for listener in &mut self.listeners {
                if listener.handles(event) {
                    listener.on_event(event);
                }
            }
        }
    }

    /// One consumer tick: drain the queue and dispatch the whole batch.
    ///
    /// Returns the number of events delivered this tick.
    pub fn pump(&mut self, queue: &EventQueue) -> usize {
        let batch = queue.drain_all();
        if !batch.is_empty() {
            debug!(count = batch.len(), "dispatching event batch");
            self.dispatch(&batch);
        }
        batch.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Listener that logs every event; the default consumer in the binary.
///
/// Pointer events are rendered as touch gestures with their normalized
/// screen coordinates; everything else is logged generically with its
/// declared extra-data type.
pub struct TraceListener;

impl EventListener for TraceListener {
    fn on_event(&mut self, event: &Event) {
        match event.service_type {
            ServiceType::Pointer => {
                let gesture = event
                    .action()
                    .map(|a| format!("{a:?}"))
                    .unwrap_or_else(|| format!("action {}", event.event_type));
                info!(
                    source = event.source_id,
                    x = event.position[0],
                    y = event.position[1],
                    "pointer {gesture}"
                );
            }
            other => {
                info!(
                    service = ?other,
                    source = event.source_id,
                    action = event.event_type,
                    extra = ?event.extra_data_type,
                    items = event.extra_data_items,
                    "event"
                );
            }
        }
    }
}

/// Convenience: builds a queue pre-wired to a dispatcher with `listener`.
pub fn queue_with_listener(listener: Box<dyn EventListener>) -> (Arc<EventQueue>, EventDispatcher) {
    let queue = Arc::new(EventQueue::new());
    let mut dispatcher = EventDispatcher::new();
    dispatcher.register(listener);
    (queue, dispatcher)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
