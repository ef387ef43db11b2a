//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Core traits
pub use crate::{
  observer::{BoxedObserver, DynObserver, Emitter, Observer},
  signal::Signal,
  subscription::Subscription,
};
// Notifications and adapters
pub use crate::{
  event::Event,
  observer::{EventObserver, Subscriber},
};
// Producers
pub use crate::signal::{create, of, Create, Of};
// Subjects
pub use crate::subject::{Capacity, ReplaySubject, Subject, SubjectSubscription};
// Subscription handles
pub use crate::subscription::{BoxedSubscription, Disposable, SubscriptionGuard};
// Errors
pub use crate::error::CapacityError;
