use std::{
  collections::VecDeque,
  fmt::{Debug, Formatter},
  sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
  thread::{self, ThreadId},
};

use smallvec::SmallVec;

use super::{
  history::{Capacity, History},
  subject_subscription::SubjectSubscription,
  subscribers::{broadcast_terminal, broadcast_value, Delivery, Slot, Snapshot, Subscribers},
};
use crate::{
  event::{Event, Terminal},
  observer::{BoxedObserver, Observer},
  signal::Signal,
  util::lock,
};

// ============================================================================
// SubjectCore
// ============================================================================

/// The shared state machine behind [`Subject`] and
/// [`ReplaySubject`](super::ReplaySubject).
///
/// # Serialization
///
/// Every send and every subscribe first acquires the *emission right*: at
/// most one thread holds it, the others wait on `idle`. Holding it spans
/// snapshot capture, history mutation and delivery, so all passes of one
/// subject are totally ordered and a subscriber never sees events out of
/// order. The `state` mutex itself is only held for short bookkeeping and
/// never while user callbacks run.
///
/// # Re-entrancy
///
/// Callbacks run on the thread that holds the emission right, so:
///
/// - `send_*` from a callback is queued and delivered, in order, right after
///   the current pass finishes. It never deadlocks and never interleaves with
///   the pass in progress.
/// - `subscribe` from a callback is served immediately. The new observer gets
///   the history (which already contains the in-flight value) but not a live
///   copy of the in-flight value.
/// - `unsubscribe` never needs the emission right and is honoured by every
///   later pass. The observer may still see the value being delivered when
///   it unsubscribed.
///
/// Subjects whose callbacks feed each other from different threads can still
/// deadlock, just like two mutexes taken in opposite order.
pub(crate) struct SubjectCore<Item, Err> {
  state: Mutex<CoreState<Item, Err>>,
  idle: Condvar,
}

struct CoreState<Item, Err> {
  subscribers: Subscribers<Item, Err>,
  history: History<Item>,
  terminal: Option<Terminal<Err>>,
  emitter: Option<ThreadId>,
  deferred: VecDeque<Event<Item, Err>>,
}

/// Work captured under the state lock, performed after releasing it.
enum Pass<Item, Err> {
  Idle,
  Next(Item, Snapshot<Item, Err>),
  Terminal(Terminal<Err>, Snapshot<Item, Err>),
}

/// Proof that the current thread holds the emission right. Releases it on
/// drop.
struct EmissionRight<'a, Item, Err> {
  core: &'a SubjectCore<Item, Err>,
}

impl<Item, Err> Drop for EmissionRight<'_, Item, Err> {
  fn drop(&mut self) {
    lock(&self.core.state).emitter = None;
    self.core.idle.notify_all();
  }
}

type Entry<'a, Item, Err> =
  (MutexGuard<'a, CoreState<Item, Err>>, Option<EmissionRight<'a, Item, Err>>);

impl<Item, Err> SubjectCore<Item, Err> {
  pub(crate) fn new(capacity: Capacity) -> Self {
    Self {
      state: Mutex::new(CoreState {
        subscribers: Subscribers::default(),
        history: History::new(capacity),
        terminal: None,
        emitter: None,
        deferred: VecDeque::new(),
      }),
      idle: Condvar::new(),
    }
  }

  /// Acquires the emission right, or notices the current thread already
  /// holds it (in which case no right is returned).
  ///
  /// The returned guard must be dropped before the right.
  fn enter(&self) -> Entry<'_, Item, Err> {
    let me = thread::current().id();
    let mut state = lock(&self.state);
    loop {
      let emitter = state.emitter;
      match emitter {
        None => {
          state.emitter = Some(me);
          return (state, Some(EmissionRight { core: self }));
        }
        Some(owner) if owner == me => return (state, None),
        Some(_) => {
          state = self
            .idle
            .wait(state)
            .unwrap_or_else(PoisonError::into_inner)
        }
      }
    }
  }

  /// Removes the given subscriptions from the active set.
  pub(crate) fn retire(&self, ids: &[usize]) {
    if ids.is_empty() {
      return;
    }
    let removed: SmallVec<[Arc<Slot<Item, Err>>; 1]> = {
      let mut state = lock(&self.state);
      ids
        .iter()
        .filter_map(|id| state.subscribers.remove(*id))
        .collect()
    };
    // Observers may run arbitrary code on drop, so drop them unlocked.
    drop(removed);
  }

  pub(crate) fn subscriber_count(&self) -> usize { lock(&self.state).subscribers.len() }

  pub(crate) fn is_terminated(&self) -> bool { lock(&self.state).terminal.is_some() }

  pub(crate) fn capacity(&self) -> Capacity { lock(&self.state).history.capacity() }

  pub(crate) fn buffered_len(&self) -> usize { lock(&self.state).history.len() }
}

impl<Item: Clone, Err: Clone> SubjectCore<Item, Err> {
  pub(crate) fn emit(&self, event: Event<Item, Err>) {
    let (mut state, right) = self.enter();
    let Some(right) = right else {
      state.deferred.push_back(event);
      return;
    };
    let pass = state.apply(event);
    drop(state);
    self.deliver(pass);
    self.drain();
    drop(right);
  }

  pub(crate) fn subscribe(
    self: &Arc<Self>, observer: BoxedObserver<'static, Item, Err>,
  ) -> SubjectSubscription<Item, Err> {
    let (mut state, right) = self.enter();
    let slot = Arc::new(Slot::new(state.subscribers.reserve_id(), observer));
    let backlog = state.history.snapshot();
    let terminal = state.terminal.clone();
    if terminal.is_none() {
      state.subscribers.insert(slot.clone());
    }
    drop(state);

    tracing::trace!(subscription = slot.id(), replayed = backlog.len(), "subscribed");
    for value in backlog {
      if slot.next(value) == Delivery::Retired {
        self.retire(&[slot.id()]);
        break;
      }
    }
    if let Some(terminal) = terminal {
      slot.terminate(terminal);
    }
    if let Some(right) = right {
      self.drain();
      drop(right);
    }
    SubjectSubscription::new(Arc::downgrade(self), slot)
  }

  /// Runs the events queued by re-entrant sends until none are left.
  fn drain(&self) {
    loop {
      let pass = {
        let mut state = lock(&self.state);
        match state.deferred.pop_front() {
          Some(event) => state.apply(event),
          None => return,
        }
      };
      self.deliver(pass);
    }
  }

  fn deliver(&self, pass: Pass<Item, Err>) {
    match pass {
      Pass::Idle => {}
      Pass::Next(value, targets) => {
        let retired = broadcast_value(&targets, value);
        drop(targets);
        self.retire(&retired);
      }
      Pass::Terminal(terminal, targets) => broadcast_terminal(targets, terminal),
    }
  }
}

impl<Item: Clone, Err: Clone> CoreState<Item, Err> {
  fn apply(&mut self, event: Event<Item, Err>) -> Pass<Item, Err> {
    if self.terminal.is_some() {
      return Pass::Idle;
    }
    match event {
      Event::Next(value) => {
        self.history.record(&value);
        Pass::Next(value, self.subscribers.snapshot())
      }
      Event::Error(err) => self.terminate(Terminal::Error(err)),
      Event::Completed => self.terminate(Terminal::Completed),
    }
  }

  fn terminate(&mut self, terminal: Terminal<Err>) -> Pass<Item, Err> {
    let targets = self.subscribers.drain();
    tracing::debug!(kind = terminal.kind(), subscribers = targets.len(), "subject terminated");
    self.terminal = Some(terminal.clone());
    Pass::Terminal(terminal, targets)
  }
}

// ============================================================================
// Subject
// ============================================================================

/// Subject: a hot signal that multicasts every event it is sent to the
/// observers currently subscribed.
///
/// `Subject` is a cheap handle; clones share the same subscribers. It can be
/// sent to from any number of threads at once. Subscribers only see events
/// sent after they subscribed, except that a subscriber arriving after the
/// subject terminated receives the stored terminal event right away.
///
/// Sending after termination is a silent no-op.
///
/// A subscriber callback that panics is detached from the subject (the panic
/// is caught and logged) and delivery to the other subscribers carries on.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
///
/// use rxsignal::prelude::*;
///
/// let subject = Subject::<i32, String>::new();
/// let results = Arc::new(Mutex::new(vec![]));
/// let c_results = results.clone();
///
/// subject.subscribe(move |v| c_results.lock().unwrap().push(v));
///
/// subject.send_next(1);
/// subject.send_next(2);
/// assert_eq!(*results.lock().unwrap(), vec![1, 2]);
/// ```
pub struct Subject<Item, Err> {
  core: Arc<SubjectCore<Item, Err>>,
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Self::with_history(Capacity::Bounded(0)) }

  pub(crate) fn with_history(capacity: Capacity) -> Self {
    Self { core: Arc::new(SubjectCore::new(capacity)) }
  }

  pub(crate) fn core(&self) -> &SubjectCore<Item, Err> { &self.core }

  /// Get the number of currently active subscribers.
  pub fn subscriber_count(&self) -> usize { self.core.subscriber_count() }

  /// `true` once an error or completion has been sent.
  pub fn is_terminated(&self) -> bool { self.core.is_terminated() }
}

impl<Item: Clone, Err: Clone> Subject<Item, Err> {
  pub fn send_next(&self, value: Item) { self.core.emit(Event::Next(value)) }

  pub fn send_error(&self, err: Err) { self.core.emit(Event::Error(err)) }

  pub fn send_completed(&self) { self.core.emit(Event::Completed) }

  pub fn send(&self, event: Event<Item, Err>) { self.core.emit(event) }
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Self { core: self.core.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self { Self::new() }
}

impl<Item, Err> Debug for Subject<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subject")
      .field("subscribers", &self.subscriber_count())
      .field("terminated", &self.is_terminated())
      .finish()
  }
}

impl<Item, Err> Signal<Item, Err> for Subject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Unsub = SubjectSubscription<Item, Err>;

  fn subscribe_with<O>(&self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    self.core.subscribe(Box::new(observer))
  }
}

/// A subject can itself subscribe to another signal and relay it.
impl<Item: Clone, Err: Clone> Observer<Item, Err> for Subject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.send_next(value) }

  #[inline]
  fn error(self, err: Err) { self.send_error(err) }

  #[inline]
  fn complete(self) { self.send_completed() }

  #[inline]
  fn is_closed(&self) -> bool { self.is_terminated() }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
  use std::{
    convert::Infallible,
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc, Barrier, Mutex,
    },
    thread,
  };

  use bencher::benchmark_group;

  use crate::{event::Event, prelude::*};

  fn recorder<Item: Send + 'static, Err: Send + 'static>(
  ) -> (Arc<Mutex<Vec<Event<Item, Err>>>>, impl FnMut(Event<Item, Err>) + Send + 'static) {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    (events, move |e| c_events.lock().unwrap().push(e))
  }

  #[rxsignal_macro::test]
  fn base_data_flow() {
    let subject = Subject::<i32, Infallible>::new();
    let results = Arc::new(Mutex::new(vec![]));
    let c_results = results.clone();

    subject.subscribe(move |v| c_results.lock().unwrap().push(v));

    subject.send_next(1);
    subject.send_next(2);

    assert_eq!(*results.lock().unwrap(), vec![1, 2]);
  }

  #[rxsignal_macro::test]
  fn early_vs_late_subscription() {
    let subject = Subject::<i32, Infallible>::new();
    let early = Arc::new(Mutex::new(vec![]));
    let late = Arc::new(Mutex::new(vec![]));

    let c_early = early.clone();
    subject.subscribe(move |v| c_early.lock().unwrap().push(v));
    subject.send_next(1);

    let c_late = late.clone();
    subject.subscribe(move |v| c_late.lock().unwrap().push(v));
    subject.send_next(2);

    assert_eq!(*early.lock().unwrap(), vec![1, 2]);
    assert_eq!(*late.lock().unwrap(), vec![2]);
  }

  #[rxsignal_macro::test]
  fn unsubscribe() {
    let subject = Subject::<i32, Infallible>::new();
    let results = Arc::new(Mutex::new(vec![]));
    let c_results = results.clone();

    let sub = subject.subscribe(move |v| c_results.lock().unwrap().push(v));
    subject.send_next(1);
    sub.unsubscribe();
    subject.send_next(2);

    assert_eq!(*results.lock().unwrap(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
    assert!(sub.is_closed());
  }

  #[rxsignal_macro::test]
  fn unsubscribe_twice_is_same_as_once() {
    let subject = Subject::<i32, Infallible>::new();
    let results = Arc::new(Mutex::new(vec![]));
    let c_results = results.clone();
    let other = subject.subscribe(|_| {});

    let sub = subject.subscribe(move |v| c_results.lock().unwrap().push(v));
    sub.unsubscribe();
    sub.unsubscribe();
    sub.clone().unsubscribe();
    subject.send_next(1);

    assert!(results.lock().unwrap().is_empty());
    assert_eq!(subject.subscriber_count(), 1);
    assert!(!other.is_closed());
  }

  #[rxsignal_macro::test]
  fn error_reaches_current_and_late_subscribers() {
    let subject = Subject::<i32, &'static str>::new();
    let (early, on_early) = recorder();
    subject.subscribe_events(on_early);

    subject.send_error("boom");

    assert_eq!(*early.lock().unwrap(), vec![Event::Error("boom")]);
    assert_eq!(subject.subscriber_count(), 0);

    for _ in 0..3 {
      let (late, on_late) = recorder();
      let sub = subject.subscribe_events(on_late);
      assert!(sub.is_closed());
      assert_eq!(*late.lock().unwrap(), vec![Event::Error("boom")]);
    }
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn sends_after_completion_are_ignored() {
    let subject = Subject::<i32, &'static str>::new();
    let (events, on_event) = recorder();
    subject.subscribe_events(on_event);

    subject.send_next(1);
    subject.send_completed();
    subject.send_next(2);
    subject.send_error("late");
    subject.send_completed();

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1), Event::Completed]);

    let (late, on_late) = recorder();
    subject.subscribe_events(on_late);
    assert_eq!(*late.lock().unwrap(), vec![Event::Completed]);
    assert!(subject.is_terminated());
  }

  #[rxsignal_macro::test]
  fn unsubscribe_after_terminal_is_noop() {
    let subject = Subject::<i32, ()>::new();
    let sub = subject.subscribe(|_| {});
    subject.send_completed();
    assert!(sub.is_closed());
    sub.unsubscribe();
    assert!(sub.is_closed());
  }

  #[rxsignal_macro::test]
  fn reentrant_next_is_delivered_after_current_pass() {
    let subject = Subject::<i32, Infallible>::new();
    let (first, on_first) = recorder();
    let (second, on_second) = recorder();

    let mut on_first = on_first;
    let feedback = subject.clone();
    subject.subscribe_events(move |e: Event<i32, Infallible>| {
      if e == Event::Next(1) {
        feedback.send_next(10);
      }
      on_first(e);
    });
    subject.subscribe_events(on_second);

    subject.send_next(1);
    subject.send_next(2);

    let expected = vec![Event::Next(1), Event::Next(10), Event::Next(2)];
    assert_eq!(*first.lock().unwrap(), expected);
    assert_eq!(*second.lock().unwrap(), expected);
  }

  #[rxsignal_macro::test]
  fn reentrant_complete_ends_stream_after_current_pass() {
    let subject = Subject::<i32, ()>::new();
    let (events, on_event) = recorder();
    let (other, on_other) = recorder();

    let closer = subject.clone();
    subject.subscribe(move |_| closer.send_completed());
    subject.subscribe_events(on_event);
    subject.subscribe_events(on_other);

    subject.send_next(1);
    subject.send_next(2);

    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1), Event::Completed]);
    assert_eq!(*other.lock().unwrap(), vec![Event::Next(1), Event::Completed]);
  }

  #[rxsignal_macro::test]
  fn subscribe_inside_next_misses_in_flight_value() {
    let subject = Subject::<i32, Infallible>::new();
    let secondary = Arc::new(Mutex::new(vec![]));
    let subs = Arc::new(Mutex::new(vec![]));

    let inner = subject.clone();
    let c_secondary = secondary.clone();
    let c_subs = subs.clone();
    subject.subscribe(move |v| {
      if v == 1 {
        let c_secondary = c_secondary.clone();
        let sub = inner.subscribe(move |v| c_secondary.lock().unwrap().push(v));
        c_subs.lock().unwrap().push(sub);
      }
    });

    subject.send_next(1);
    assert!(secondary.lock().unwrap().is_empty());

    subject.send_next(2);
    assert_eq!(*secondary.lock().unwrap(), vec![2]);
    assert_eq!(subject.subscriber_count(), 2);
  }

  #[rxsignal_macro::test]
  fn unsubscribe_inside_next_stops_later_values() {
    let subject = Subject::<i32, Infallible>::new();
    let results = Arc::new(Mutex::new(vec![]));
    let own: Arc<Mutex<Option<SubjectSubscription<i32, Infallible>>>> = Arc::new(Mutex::new(None));

    let c_results = results.clone();
    let c_own = own.clone();
    let sub = subject.subscribe(move |v| {
      c_results.lock().unwrap().push(v);
      if let Some(sub) = c_own.lock().unwrap().take() {
        sub.unsubscribe();
      }
    });
    *own.lock().unwrap() = Some(sub.clone());

    subject.send_next(1);
    subject.send_next(2);

    assert_eq!(*results.lock().unwrap(), vec![1]);
    assert!(sub.is_closed());
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn panicking_subscriber_is_isolated() {
    let subject = Subject::<i32, ()>::new();
    let (before, on_before) = recorder();
    let (after, on_after) = recorder();

    subject.subscribe_events(on_before);
    let faulty = subject.subscribe(|v| {
      if v == 2 {
        panic!("faulty subscriber");
      }
    });
    subject.subscribe_events(on_after);

    subject.send_next(1);
    subject.send_next(2);
    subject.send_next(3);
    subject.send_completed();

    let expected = vec![Event::Next(1), Event::Next(2), Event::Next(3), Event::Completed];
    assert_eq!(*before.lock().unwrap(), expected);
    assert_eq!(*after.lock().unwrap(), expected);
    assert!(faulty.is_closed());
  }

  #[rxsignal_macro::test]
  fn panicking_is_closed_is_isolated() {
    struct FaultyClosed;

    impl Observer<i32, ()> for FaultyClosed {
      fn next(&mut self, _: i32) {}
      fn error(self, _: ()) {}
      fn complete(self) {}
      fn is_closed(&self) -> bool { panic!("is_closed blew up") }
    }

    let subject = Subject::<i32, ()>::new();
    let faulty = subject.subscribe_with(FaultyClosed);
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    subject.subscribe(move |_| {
      c_hits.fetch_add(1, Ordering::SeqCst);
    });

    subject.send_next(1);
    subject.send_next(2);

    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert!(faulty.is_closed());
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[rxsignal_macro::test]
  fn panicking_subscriber_is_removed_from_active_set() {
    let subject = Subject::<i32, ()>::new();
    subject.subscribe(|_| panic!("always"));
    subject.subscribe(|_| {});
    assert_eq!(subject.subscriber_count(), 2);

    subject.send_next(1);
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[rxsignal_macro::test]
  fn closed_observer_is_dropped_from_active_set() {
    struct TakeOne(Arc<AtomicUsize>, bool);

    impl Observer<i32, ()> for TakeOne {
      fn next(&mut self, _: i32) {
        self.0.fetch_add(1, Ordering::SeqCst);
        self.1 = true;
      }
      fn error(self, _: ()) {}
      fn complete(self) {}
      fn is_closed(&self) -> bool { self.1 }
    }

    let hits = Arc::new(AtomicUsize::new(0));
    let subject = Subject::<i32, ()>::new();
    let sub = subject.subscribe_with(TakeOne(hits.clone(), false));

    subject.send_next(1);
    subject.send_next(2);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(sub.is_closed());
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[rxsignal_macro::test]
  fn observer_dropped_promptly_on_unsubscribe() {
    struct Tracked(Arc<AtomicUsize>);

    impl Drop for Tracked {
      fn drop(&mut self) { self.0.fetch_add(1, Ordering::SeqCst); }
    }

    impl Observer<i32, ()> for Tracked {
      fn next(&mut self, _: i32) {}
      fn error(self, _: ()) {}
      fn complete(self) {}
      fn is_closed(&self) -> bool { false }
    }

    let drops = Arc::new(AtomicUsize::new(0));
    let subject = Subject::<i32, ()>::new();
    let sub = subject.subscribe_with(Tracked(drops.clone()));

    assert_eq!(drops.load(Ordering::SeqCst), 0);
    sub.unsubscribe();
    assert_eq!(drops.load(Ordering::SeqCst), 1);
  }

  #[rxsignal_macro::test]
  fn unsubscribe_from_another_thread_during_delivery() {
    struct Blocking {
      seen: Arc<Mutex<Vec<i32>>>,
      entered: Arc<Barrier>,
      resume: Arc<Barrier>,
      drops: Arc<AtomicUsize>,
    }

    impl Drop for Blocking {
      fn drop(&mut self) { self.drops.fetch_add(1, Ordering::SeqCst); }
    }

    impl Observer<i32, ()> for Blocking {
      fn next(&mut self, v: i32) {
        self.seen.lock().unwrap().push(v);
        if v == 1 {
          self.entered.wait();
          self.resume.wait();
        }
      }
      fn error(self, _: ()) {}
      fn complete(self) {}
      fn is_closed(&self) -> bool { false }
    }

    let seen = Arc::new(Mutex::new(vec![]));
    let entered = Arc::new(Barrier::new(2));
    let resume = Arc::new(Barrier::new(2));
    let drops = Arc::new(AtomicUsize::new(0));

    let subject = Subject::<i32, ()>::new();
    let sub = subject.subscribe_with(Blocking {
      seen: seen.clone(),
      entered: entered.clone(),
      resume: resume.clone(),
      drops: drops.clone(),
    });

    thread::scope(|s| {
      let sender = subject.clone();
      let sending = s.spawn(move || {
        for v in 1..=100 {
          sender.send_next(v);
        }
      });

      entered.wait();
      sub.unsubscribe();
      // The delivering thread still holds the observer.
      assert!(sub.is_closed());
      assert_eq!(subject.subscriber_count(), 0);
      assert_eq!(drops.load(Ordering::SeqCst), 0);
      resume.wait();

      sending.join().unwrap();
    });

    assert_eq!(*seen.lock().unwrap(), vec![1]);
    assert_eq!(drops.load(Ordering::SeqCst), 1);
  }

  #[rxsignal_macro::test]
  fn subscription_does_not_keep_subject_alive() {
    let subject = Subject::<i32, ()>::new();
    let sub = subject.subscribe(|_| {});
    drop(subject);

    assert!(!sub.is_closed());
    sub.unsubscribe();
    assert!(sub.is_closed());
  }

  #[rxsignal_macro::test]
  fn subject_relays_another_signal() {
    let subject = Subject::<&'static str, Infallible>::new();
    let (events, on_event) = recorder();
    subject.subscribe_events(on_event);

    of("X").subscribe_with(subject.clone());

    assert_eq!(*events.lock().unwrap(), vec![Event::Next("X"), Event::Completed]);
    assert!(subject.is_terminated());
  }

  #[rxsignal_macro::test]
  fn concurrent_terminal_is_exactly_once() {
    let subject = Subject::<i32, usize>::new();
    let (events, on_event) = recorder();
    subject.subscribe_events(on_event);

    thread::scope(|s| {
      for i in 0..8 {
        let subject = subject.clone();
        s.spawn(move || {
          if i % 2 == 0 {
            subject.send_completed();
          } else {
            subject.send_error(i);
          }
          subject.send_next(i as i32);
        });
      }
    });

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_terminal());
  }

  #[rxsignal_macro::test]
  fn racing_subscriber_sees_suffix_of_global_order() {
    const SENDERS: usize = 8;
    const PER_SENDER: usize = 200;

    let subject = Subject::<usize, ()>::new();
    let (witness, on_witness) = recorder();
    subject.subscribe_events(on_witness);
    let (late, on_late) = recorder();

    thread::scope(|s| {
      for t in 0..SENDERS {
        let subject = subject.clone();
        s.spawn(move || {
          for i in 0..PER_SENDER {
            subject.send_next(t * PER_SENDER + i);
          }
        });
      }
      let subject = subject.clone();
      s.spawn(move || {
        thread::yield_now();
        subject.subscribe_events(on_late)
      });
    });

    let witness: Vec<usize> = witness.lock().unwrap().drain(..).filter_map(Event::into_value).collect();
    let late: Vec<usize> = late.lock().unwrap().drain(..).filter_map(Event::into_value).collect();

    assert_eq!(witness.len(), SENDERS * PER_SENDER);
    assert!(late.len() <= witness.len());
    assert_eq!(&witness[witness.len() - late.len()..], &late[..]);
  }

  fn fan_out() {
    let subject = Subject::<usize, ()>::new();
    let hits = Arc::new(AtomicUsize::new(0));
    for _ in 0..4 {
      let hits = hits.clone();
      subject.subscribe(move |_| {
        hits.fetch_add(1, Ordering::Relaxed);
      });
    }
    (0..100).for_each(|v| subject.send_next(v));
    assert_eq!(hits.load(Ordering::Relaxed), 400);
  }

  #[test]
  fn benchmark() { do_bench(); }

  benchmark_group!(do_bench, bench);

  fn bench(b: &mut bencher::Bencher) { b.iter(fan_out); }
}
