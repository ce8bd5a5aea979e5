//! Handler registry.
//!
//! Maps event-type names to handlers in registration order, plus one
//! optional generic handler that sees every dispatched event after the
//! type-specific ones. Registration may race with dispatch; the dispatcher
//! takes a [`DispatchPlan`] snapshot when it dequeues an event, so changes
//! made afterwards only affect later events.

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use super::Handler;

/// Handlers to run for one event, captured at dequeue time.
pub struct DispatchPlan {
    pub handlers: Vec<Handler>,
    pub generic: Option<Handler>,
}

impl DispatchPlan {
    /// Type-specific handlers in order, then the generic one.
    pub fn iter(&self) -> impl Iterator<Item = &Handler> {
        self.handlers.iter().chain(self.generic.iter())
    }

    pub fn len(&self) -> usize {
        self.handlers.len() + usize::from(self.generic.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, Vec<Handler>>,
    generic: RwLock<Option<Handler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `kind`.
    pub fn add(&self, kind: &str, handler: Handler) {
        self.handlers
            .entry(kind.to_ascii_lowercase())
            .or_default()
            .push(handler);
    }

    /// Drop every handler for `kind`, then add `handler`.
    pub fn replace(&self, kind: &str, handler: Handler) {
        self.handlers.insert(kind.to_ascii_lowercase(), vec![handler]);
    }

    /// Remove the first registration of this exact handler for `kind`.
    pub fn remove(&self, kind: &str, handler: &Handler) -> bool {
        let kind = kind.to_ascii_lowercase();
        let removed = match self.handlers.get_mut(&kind) {
            Some(mut list) => match list.iter().position(|h| Arc::ptr_eq(h, handler)) {
                Some(pos) => {
                    list.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        };
        self.handlers.remove_if(&kind, |_, list| list.is_empty());
        removed
    }

    /// Remove every handler for `kind`. Returns how many were removed.
    pub fn clear(&self, kind: &str) -> usize {
        self.handlers
            .remove(&kind.to_ascii_lowercase())
            .map_or(0, |(_, list)| list.len())
    }

    /// Set or replace the catch-all handler. Returns the previous one.
    pub fn set_generic(&self, handler: Handler) -> Option<Handler> {
        self.generic.write().replace(handler)
    }

    pub fn clear_generic(&self) -> Option<Handler> {
        self.generic.write().take()
    }

    /// Number of type-specific handlers for `kind`.
    pub fn count(&self, kind: &str) -> usize {
        self.handlers
            .get(&kind.to_ascii_lowercase())
            .map_or(0, |list| list.len())
    }

    /// Snapshot the handlers for an event type, or `None` if nothing
    /// (not even a generic handler) would run.
    pub fn plan(&self, kind: &str) -> Option<DispatchPlan> {
        let handlers = self
            .handlers
            .get(kind)
            .map(|list| list.value().clone())
            .unwrap_or_default();
        let generic = self.generic.read().clone();

        let plan = DispatchPlan { handlers, generic };
        (!plan.is_empty()).then_some(plan)
    }
}
