//! Synchronous observer list.
//!
//! Every GridKit engine owns an [`Observers`] list for its own state type.
//! Listeners are called synchronously, in registration order, with the full
//! state after each change. A new subscriber is called once immediately with
//! the current state, so it never has to query the engine separately.
//!
//! ```rust
//! use gridkit_core::Observers;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut observers: Observers<u32> = Observers::new();
//! let seen = Rc::new(Cell::new(0));
//! let sink = seen.clone();
//! let id = observers.subscribe(&7, move |value| sink.set(*value));
//! assert_eq!(seen.get(), 7);
//!
//! observers.notify(&9);
//! assert_eq!(seen.get(), 9);
//! assert!(observers.unsubscribe(id));
//! ```

use std::fmt;
use uuid::Uuid;

use crate::types::Listener;

/// Subscription handle for unsubscribing from state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Ordered list of state listeners.
pub struct Observers<S> {
    listeners: Vec<(SubscriptionId, Listener<S>)>,
}

impl<S> Observers<S> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Registers `listener` and calls it once with `current`.
    pub fn subscribe<F>(&mut self, current: &S, listener: F) -> SubscriptionId
    where
        F: FnMut(&S) + 'static,
    {
        let id = SubscriptionId::new();
        let mut listener: Listener<S> = Box::new(listener);
        listener(current);
        self.listeners.push((id, listener));
        tracing::trace!("observer {} subscribed", id);
        id
    }

    /// Removes a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Calls every listener with `state`.
    pub fn notify(&mut self, state: &S) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(state);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<S> Default for Observers<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Observers<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
