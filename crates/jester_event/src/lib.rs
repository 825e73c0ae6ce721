//! # jester_event - Multicast Events
//!
//! Synchronous fan-out of typed events to any number of listeners:
//! - Priority-ordered delivery (higher first, subscription order within a priority)
//! - Unsubscription by [`SubscriberId`]
//! - Handlers run to completion inside [`Broadcaster::broadcast`]

/// Listener priority
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Event handler function type
pub type EventHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Subscriber ID
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

/// Multicast delegate for a single event type
pub struct Broadcaster<E> {
    handlers: Vec<(SubscriberId, Priority, EventHandler<E>)>,
    next_subscriber_id: u64,
}

impl<E> Broadcaster<E> {
    /// Create a broadcaster with no listeners
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_subscriber_id: 1,
        }
    }

    /// Subscribe at normal priority
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_with_priority(handler, Priority::Normal)
    }

    /// Subscribe with priority
    pub fn subscribe_with_priority<F>(&mut self, handler: F, priority: Priority) -> SubscriberId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId(self.next_subscriber_id);
        self.next_subscriber_id += 1;

        self.handlers.push((id, priority, Box::new(handler)));
        // Stable sort keeps subscription order within a priority
        self.handlers.sort_by(|a, b| b.1.cmp(&a.1));
        id
    }

    /// Unsubscribe. Returns whether the subscriber was present.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub_id, _, _)| *sub_id != id);
        self.handlers.len() != before
    }

    /// Deliver `event` to every listener
    pub fn broadcast(&self, event: &E) {
        for (_, _, handler) in &self.handlers {
            handler(event);
        }
    }

    /// Drop every listener
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of listeners
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if there are no listeners
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Broadcaster<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Broadcaster<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Broadcaster")
            .field("listeners", &self.handlers.len())
            .finish()
    }
}

/// Prelude
pub mod prelude {
    pub use crate::{Broadcaster, EventHandler, Priority, SubscriberId};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct TestEvent(i32);

    #[test]
    fn test_broadcast_reaches_all() {
        let mut broadcaster = Broadcaster::new();
        let counter = Arc::new(AtomicU32::new(0));
        for _ in 0..3 {
            let counter = counter.clone();
            broadcaster.subscribe(move |e: &TestEvent| {
                counter.fetch_add(e.0 as u32, Ordering::SeqCst);
            });
        }

        broadcaster.broadcast(&TestEvent(2));
        assert_eq!(counter.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_priority() {
        let mut broadcaster = Broadcaster::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let order1 = order.clone();
        let order2 = order.clone();

        broadcaster.subscribe_with_priority(
            move |e: &TestEvent| {
                order1.lock().push(("low", e.0));
            },
            Priority::Low,
        );
        broadcaster.subscribe_with_priority(
            move |e: &TestEvent| {
                order2.lock().push(("high", e.0));
            },
            Priority::High,
        );

        broadcaster.broadcast(&TestEvent(42));

        let received = order.lock();
        assert_eq!(received[0], ("high", 42));
        assert_eq!(received[1], ("low", 42));
    }

    #[test]
    fn test_unsubscribe() {
        let mut broadcaster = Broadcaster::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();
        let id = broadcaster.subscribe(move |_: &TestEvent| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(broadcaster.unsubscribe(id));
        assert!(!broadcaster.unsubscribe(id));
        broadcaster.broadcast(&TestEvent(0));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(broadcaster.is_empty());
    }
}
