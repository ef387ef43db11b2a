//! The producer contract and the built-in producers.
//!
//! A [`Signal`] is anything that can be subscribed to. Subjects implement it,
//! and so do the two stateless producers in this module: [`of`] emits one
//! value and completes, [`create`] runs a closure against each new observer.

use crate::{
  event::Event,
  observer::{EventObserver, Observer, Subscriber},
  subscription::Subscription,
};

pub mod create;
pub mod of;

pub use create::{create, Create};
pub use of::{of, Of};

/// Something subscribable that produces a sequence of [`Event`]s.
///
/// Implementations must honor the stream grammar (values, then at most one
/// terminal event) and return a subscription whose `unsubscribe` stops any
/// further delivery to that observer.
pub trait Signal<Item, Err> {
  type Unsub: Subscription;

  /// Registers `observer` and returns the handle that cancels it.
  fn subscribe_with<O>(&self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + Send + 'static;

  /// Subscribes a `next` callback; errors and completion are ignored.
  fn subscribe<N>(&self, next: N) -> Self::Unsub
  where
    N: FnMut(Item) + Send + 'static,
    Err: 'static,
  {
    self.subscribe_with(Subscriber::new(next, ignore::<Err> as fn(Err), noop as fn()))
  }

  fn subscribe_err<N, E>(&self, next: N, error: E) -> Self::Unsub
  where
    N: FnMut(Item) + Send + 'static,
    E: FnOnce(Err) + Send + 'static,
  {
    self.subscribe_with(Subscriber::new(next, error, noop as fn()))
  }

  fn subscribe_complete<N, C>(&self, next: N, complete: C) -> Self::Unsub
  where
    N: FnMut(Item) + Send + 'static,
    C: FnOnce() + Send + 'static,
    Err: 'static,
  {
    self.subscribe_with(Subscriber::new(next, ignore::<Err> as fn(Err), complete))
  }

  fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Self::Unsub
  where
    N: FnMut(Item) + Send + 'static,
    E: FnOnce(Err) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe_with(Subscriber::new(next, error, complete))
  }

  /// Subscribes one callback that sees every notification as an [`Event`].
  fn subscribe_events<F>(&self, f: F) -> Self::Unsub
  where
    F: FnMut(Event<Item, Err>) + Send + 'static,
  {
    self.subscribe_with(EventObserver::new(f))
  }
}

fn ignore<T>(_: T) {}

fn noop() {}
