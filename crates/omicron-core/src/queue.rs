//! Thread-safe hand-off queue between the receive task and the consumer.
//!
//! The transport's receive loop runs at network rate; the consumer drains
//! at its own tick rate. The two only ever meet inside this queue, so the
//! critical sections are kept to the bare enqueue/swap operations — the
//! receive path must never wait on consumer processing time.
//!
//! Events are delivered exactly once, in arrival order, to the single
//! logical drain consumer. There is no priority, deduplication, or
//! coalescing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tracing::debug;

use crate::event::data::Event;

/// A mutex-guarded FIFO of decoded events.
///
/// Unbounded by default: a stalled consumer grows the backlog without
/// dropping anything. [`EventQueue::with_capacity_limit`] opts in to a
/// drop-oldest bound for deployments where memory matters more than a
/// complete history.
///
/// # Examples
///
/// ```rust
/// use omicron_core::EventQueue;
///
/// let queue = EventQueue::new();
/// assert!(queue.drain_all().is_empty());
/// ```
pub struct EventQueue {
    events: Mutex<VecDeque<Event>>,
    /// `None` = unbounded.
    capacity_limit: Option<usize>,
    /// Events discarded by the drop-oldest policy since construction.
    dropped: AtomicU64,
}

impl EventQueue {
    /// Creates an unbounded queue.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity_limit: None,
            dropped: AtomicU64::new(0),
        }
    }

    /// Creates a queue that holds at most `limit` events, discarding the
    /// oldest entry on overflow.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(limit)),
            capacity_limit: Some(limit),
            dropped: AtomicU64::new(0),
        }
    }

    /// Appends `event` to the tail.
    ///
    /// The lock is held only for the push (plus one pop when a capacity
    /// limit is active and reached).
    pub fn publish(&self, event: Event) {
        let mut guard = self.events.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(limit) = self.capacity_limit {
            if guard.len() >= limit {
                guard.pop_front();
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(total, "event queue full, dropped oldest event");
            }
        }
        guard.push_back(event);
    }

    /// Atomically removes and returns the entire backlog in arrival order.
    ///
    /// An empty queue yields an empty vec without blocking. The internal
    /// buffer is swapped out wholesale, so the lock is held for O(1) time
    /// regardless of backlog size.
    pub fn drain_all(&self) -> Vec<Event> {
        let mut guard = self.events.lock().unwrap_or_else(|e| e.into_inner());
        let drained = std::mem::take(&mut *guard);
        drop(guard);
        drained.into()
    }

    /// Number of events currently buffered.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns `true` when no events are buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events discarded by the drop-oldest policy. Always 0 for unbounded
    /// queues.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
