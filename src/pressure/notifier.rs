//! Pressure Notifier Module
//!
//! The publish/subscribe seam between caches and whatever detects memory
//! pressure, plus an in-process implementation of it.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::debug;

/// Callback run when memory pressure is signalled.
pub type PressureHandler = Arc<dyn Fn() + Send + Sync>;

/// Identifies one registered handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// == Memory Pressure Source ==
/// Anything that can deliver memory-pressure signals to subscribers.
///
/// Handlers may be invoked zero or more times, at any time, from any thread.
/// After `unsubscribe` returns, the source must not start new invocations of
/// that handler.
pub trait MemoryPressureSource: Send + Sync {
    /// Registers `handler` and returns the id needed to remove it.
    fn subscribe(&self, handler: PressureHandler) -> SubscriptionId;

    /// Removes a handler. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(SubscriptionId, PressureHandler)>,
}

// == Pressure Notifier ==
/// In-process [`MemoryPressureSource`] driven by explicit [`notify`] calls.
///
/// [`notify`]: PressureNotifier::notify
#[derive(Default)]
pub struct PressureNotifier {
    registry: Mutex<Registry>,
}

impl PressureNotifier {
    // == Constructor ==
    /// Creates a notifier with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    // == Shared ==
    /// The process-wide notifier that caches subscribe to by default.
    pub fn shared() -> Arc<PressureNotifier> {
        static SHARED: OnceLock<Arc<PressureNotifier>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(PressureNotifier::new())))
    }

    // == Notify ==
    /// Signals memory pressure to every current subscriber.
    ///
    /// Handlers run on the calling thread after the registry lock is
    /// released, so a handler may subscribe or unsubscribe. Returns the number
    /// of handlers invoked.
    pub fn notify(&self) -> usize {
        let handlers: Vec<PressureHandler> = self
            .registry
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        debug!(subscribers = handlers.len(), "Delivering memory pressure signal");
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    // == Subscriber Count ==
    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().handlers.len()
    }
}

impl MemoryPressureSource for PressureNotifier {
    fn subscribe(&self, handler: PressureHandler) -> SubscriptionId {
        let mut registry = self.registry.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.handlers.push((id, handler));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.registry
            .lock()
            .handlers
            .retain(|(handler_id, _)| *handler_id != id);
    }
}

impl fmt::Debug for PressureNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PressureNotifier")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
