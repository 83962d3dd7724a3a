//! Subscription Guard
//!
//! Ties a pressure handler registration to a value's lifetime.

use std::fmt;
use std::sync::Arc;

use crate::pressure::{MemoryPressureSource, PressureHandler, SubscriptionId};

// == Subscription ==
/// A live registration with a [`MemoryPressureSource`].
///
/// Dropping the guard unsubscribes exactly once.
pub struct Subscription {
    source: Arc<dyn MemoryPressureSource>,
    id: SubscriptionId,
}

impl Subscription {
    // == Register ==
    /// Subscribes `handler` to `source` and returns the guard owning it.
    pub fn register(source: Arc<dyn MemoryPressureSource>, handler: PressureHandler) -> Self {
        let id = source.subscribe(handler);
        Self { source, id }
    }

    // == Id ==
    /// The id this guard will unsubscribe on drop.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
