use std::fmt::{Debug, Formatter};

use super::{
  history::Capacity, subject_core::Subject, subject_subscription::SubjectSubscription,
};
use crate::{error::CapacityError, event::Event, observer::Observer, signal::Signal};

/// A [`Subject`] that remembers what it was sent.
///
/// Up to `capacity` of the most recent values are kept, oldest first, and
/// replayed to every new subscriber before it sees anything live. Once the
/// subject terminates, the terminal event is kept as well, so a late
/// subscriber receives the retained values followed by the terminal event.
///
/// With `Capacity::Bounded(0)` no values are replayed, only the terminal
/// event.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxsignal::prelude::*;
///
/// let subject = ReplaySubject::<i32, ()>::with_capacity(2);
/// subject.send_next(1);
/// subject.send_next(2);
/// subject.send_next(3);
/// subject.send_completed();
///
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// subject.subscribe(move |v| c_seen.lock().unwrap().push(v));
/// assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
/// ```
pub struct ReplaySubject<Item, Err> {
  subject: Subject<Item, Err>,
}

impl<Item, Err> ReplaySubject<Item, Err> {
  pub fn new(capacity: Capacity) -> Self { Self { subject: Subject::with_history(capacity) } }

  /// Keeps at most `n` values.
  pub fn with_capacity(n: usize) -> Self { Self::new(Capacity::Bounded(n)) }

  /// Keeps every value ever sent.
  pub fn unlimited() -> Self { Self::new(Capacity::Unlimited) }

  /// Builds a replay subject from an unchecked capacity, such as a signed
  /// integer or a string read from configuration.
  pub fn try_new<C>(capacity: C) -> Result<Self, CapacityError>
  where
    C: TryInto<Capacity, Error = CapacityError>,
  {
    Ok(Self::new(capacity.try_into()?))
  }

  pub fn capacity(&self) -> Capacity { self.subject.core().capacity() }

  /// Number of values currently held for replay.
  pub fn buffered_len(&self) -> usize { self.subject.core().buffered_len() }

  /// Get the number of currently active subscribers.
  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }

  /// `true` once an error or completion has been sent.
  pub fn is_terminated(&self) -> bool { self.subject.is_terminated() }
}

impl<Item: Clone, Err: Clone> ReplaySubject<Item, Err> {
  pub fn send_next(&self, value: Item) { self.subject.send_next(value) }

  pub fn send_error(&self, err: Err) { self.subject.send_error(err) }

  pub fn send_completed(&self) { self.subject.send_completed() }

  pub fn send(&self, event: Event<Item, Err>) { self.subject.send(event) }
}

impl<Item, Err> Clone for ReplaySubject<Item, Err> {
  fn clone(&self) -> Self { Self { subject: self.subject.clone() } }
}

impl<Item, Err> Debug for ReplaySubject<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ReplaySubject")
      .field("capacity", &self.capacity())
      .field("buffered", &self.buffered_len())
      .field("subscribers", &self.subscriber_count())
      .field("terminated", &self.is_terminated())
      .finish()
  }
}

impl<Item, Err> Signal<Item, Err> for ReplaySubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Unsub = SubjectSubscription<Item, Err>;

  #[inline]
  fn subscribe_with<O>(&self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    self.subject.subscribe_with(observer)
  }
}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for ReplaySubject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.send_next(value) }

  #[inline]
  fn error(self, err: Err) { self.send_error(err) }

  #[inline]
  fn complete(self) { self.send_completed() }

  #[inline]
  fn is_closed(&self) -> bool { self.is_terminated() }
}
