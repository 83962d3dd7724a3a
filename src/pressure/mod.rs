//! Memory Pressure Module
//!
//! Caches subscribe here at construction and are cleared whenever a signal is
//! delivered. How pressure is detected is up to the publisher.

mod notifier;
mod subscription;

pub use notifier::{MemoryPressureSource, PressureHandler, PressureNotifier, SubscriptionId};
pub use subscription::Subscription;
