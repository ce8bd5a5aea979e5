//! Unbounded FIFO work queues with wakeup.
//!
//! Both the inbound event queue (reader → dispatcher) and the outbound
//! write queue (any caller → writer) are a [`WorkQueue`]. Pushing stores a
//! wakeup permit, so a consumer that checks the queue, finds it empty and
//! then awaits [`WorkQueue::ready`] cannot miss an item pushed in between.

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::Notify;

use parley_proto::Event;

/// Parsed events awaiting dispatch.
pub type EventQueue = WorkQueue<Event>;

/// Raw outgoing lines awaiting the flood-controlled writer.
pub type WriteQueue = WorkQueue<String>;

#[derive(Debug)]
pub struct WorkQueue<T> {
    items: Mutex<VecDeque<T>>,
    ready: Notify,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Notify::new(),
        }
    }

    /// Append to the tail and wake the consumer.
    pub fn push(&self, item: T) {
        self.items.lock().push_back(item);
        self.ready.notify_one();
    }

    /// Remove and return the head.
    pub fn pop(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    /// Drop everything queued. Returns how many items were dropped.
    pub fn clear(&self) -> usize {
        let mut items = self.items.lock();
        let dropped = items.len();
        items.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Wait for the next push (or return at once if one happened since the
    /// last wait).
    pub async fn ready(&self) {
        self.ready.notified().await;
    }
}
