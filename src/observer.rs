//! Observer trait and implementations
//!
//! The Observer trait defines the consumer side of a stream. It provides
//! three methods: next (for values), error (for failures), and complete (for
//! stream completion).

use crate::event::Event;

// ============================================================================
// Observer Trait
// ============================================================================

/// The consumer of a stream.
///
/// `error` and `complete` consume the observer: nothing can be delivered
/// after a terminal event.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the failure that ends the stream.
  fn error(self, err: Err);

  /// Receive the completion that ends the stream.
  fn complete(self);

  /// Returns `true` if the observer will not accept more values.
  ///
  /// Subjects drop an observer from their active set as soon as it reports
  /// closed after a delivery.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// Emitter Trait
// ============================================================================

/// Producer-facing facade handed to [`create`](crate::signal::create).
///
/// Unlike `Observer`, every method takes `&mut self` so the facade can be
/// passed as `&mut dyn Emitter` without boxing the downstream observer.
pub trait Emitter<Item, Err> {
  fn next(&mut self, value: Item);
  fn error(&mut self, err: Err);
  fn complete(&mut self);
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`], so subjects can hold observers of
/// different concrete types behind one `Box<dyn _>`.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { (*self).error(err); }
  fn box_complete(self: Box<Self>) { (*self).complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// Boxed observer that can be moved across threads.
pub type BoxedObserver<'a, Item, Err> = Box<dyn DynObserver<Item, Err> + Send + 'a>;

impl<'a, Item, Err> Observer<Item, Err> for BoxedObserver<'a, Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// An observer assembled from three callbacks.
///
/// Every callback must be supplied; pass a no-op closure for the ones you do
/// not care about. The `Signal::subscribe*` helpers do this for you.
#[derive(Clone)]
pub struct Subscriber<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> Subscriber<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self { Self { next, error, complete } }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for Subscriber<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(self, err: Err) { (self.error)(err) }

  #[inline]
  fn complete(self) { (self.complete)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// An observer that receives every notification as an [`Event`].
#[derive(Clone)]
pub struct EventObserver<F>(F);

impl<F> EventObserver<F> {
  pub fn new(f: F) -> Self { Self(f) }
}

impl<Item, Err, F> Observer<Item, Err> for EventObserver<F>
where
  F: FnMut(Event<Item, Err>),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(Event::Next(value)) }

  #[inline]
  fn error(mut self, err: Err) { (self.0)(Event::Error(err)) }

  #[inline]
  fn complete(mut self) { (self.0)(Event::Completed) }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Option observer - None ignores all events, Some delegates to inner
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().map_or(true, Observer::is_closed) }
}

// ============================================================================
// Tests
// ============================================================================
