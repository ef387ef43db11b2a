use std::{
  panic::{self, AssertUnwindSafe},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, TryLockError,
  },
};

use smallvec::SmallVec;

use crate::{
  event::Terminal,
  observer::{BoxedObserver, Observer},
  util::{lock, panic_message},
};

/// A point-in-time copy of the active set that a multicast pass iterates.
pub(crate) type Snapshot<Item, Err> = SmallVec<[Arc<Slot<Item, Err>>; 4]>;

/// Ids of slots that must leave the active set after a pass.
pub(crate) type Retired = SmallVec<[usize; 1]>;

/// One registered observer.
///
/// The `closed` flag is the source of truth for "may this observer still be
/// called". It flips exactly once: on unsubscribe, on the terminal event, or
/// when the observer panics or reports itself closed.
pub(crate) struct Slot<Item, Err> {
  id: usize,
  closed: AtomicBool,
  observer: Mutex<Option<BoxedObserver<'static, Item, Err>>>,
}

/// Outcome of handing one value to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delivery {
  Delivered,
  Skipped,
  Retired,
}

impl<Item, Err> Slot<Item, Err> {
  pub(crate) fn new(id: usize, observer: BoxedObserver<'static, Item, Err>) -> Self {
    Self { id, closed: AtomicBool::new(false), observer: Mutex::new(Some(observer)) }
  }

  #[inline]
  pub(crate) fn id(&self) -> usize { self.id }

  #[inline]
  pub(crate) fn is_closed(&self) -> bool { self.closed.load(Ordering::Acquire) }

  /// Marks the slot closed. Returns `true` only for the call that closed it.
  #[inline]
  pub(crate) fn close(&self) -> bool { !self.closed.swap(true, Ordering::AcqRel) }

  /// Drops the observer now unless a delivery is running on it, in which case
  /// the delivering thread drops it once the callback returns.
  pub(crate) fn release(&self) {
    let observer = match self.observer.try_lock() {
      Ok(mut guard) => guard.take(),
      Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().take(),
      Err(TryLockError::WouldBlock) => None,
    };
    drop(observer);
  }

  pub(crate) fn next(&self, value: Item) -> Delivery {
    if self.is_closed() {
      return Delivery::Skipped;
    }
    let mut guard = lock(&self.observer);
    let Some(observer) = guard.as_mut() else {
      return Delivery::Skipped;
    };
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
      observer.next(value);
      observer.is_closed()
    }));
    let done = match outcome {
      Ok(closed) => closed,
      Err(payload) => {
        tracing::error!(
          subscription = self.id,
          event = "next",
          panic = panic_message(&*payload),
          "subscriber panicked, detaching it"
        );
        true
      }
    };
    if done || self.is_closed() {
      self.closed.store(true, Ordering::Release);
      let observer = guard.take();
      drop(guard);
      drop(observer);
      return Delivery::Retired;
    }
    Delivery::Delivered
  }

  /// Delivers the terminal event, if the slot is still open, and closes it.
  pub(crate) fn terminate(&self, terminal: Terminal<Err>) {
    if !self.close() {
      return;
    }
    let Some(observer) = lock(&self.observer).take() else {
      return;
    };
    let kind = terminal.kind();
    let outcome = panic::catch_unwind(AssertUnwindSafe(move || terminal.notify::<Item, _>(observer)));
    if let Err(payload) = outcome {
      tracing::error!(
        subscription = self.id,
        event = kind,
        panic = panic_message(&*payload),
        "subscriber panicked while handling the terminal event"
      );
    }
  }
}

/// The active set of a subject, keyed by subscription id.
///
/// Insertion order is kept so delivery order is stable, though nothing relies
/// on it for correctness.
pub(crate) struct Subscribers<Item, Err> {
  next_id: usize,
  slots: SmallVec<[Arc<Slot<Item, Err>>; 2]>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Self { next_id: 0, slots: SmallVec::new() } }
}

impl<Item, Err> Subscribers<Item, Err> {
  /// Hands out the next subscription id without registering anything.
  #[inline]
  pub(crate) fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  #[inline]
  pub(crate) fn insert(&mut self, slot: Arc<Slot<Item, Err>>) { self.slots.push(slot); }

  pub(crate) fn remove(&mut self, id: usize) -> Option<Arc<Slot<Item, Err>>> {
    self
      .slots
      .iter()
      .position(|slot| slot.id() == id)
      .map(|pos| self.slots.remove(pos))
  }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.slots.len() }

  pub(crate) fn snapshot(&self) -> Snapshot<Item, Err> { self.slots.iter().cloned().collect() }

  /// Empties the set, handing back what it held.
  pub(crate) fn drain(&mut self) -> Snapshot<Item, Err> { self.slots.drain(..).collect() }
}

/// Sends `value` to every slot of `targets`.
///
/// The value is cloned for all slots except the last one, which receives the
/// moved value.
pub(crate) fn broadcast_value<Item, Err>(targets: &[Arc<Slot<Item, Err>>], value: Item) -> Retired
where
  Item: Clone,
{
  let mut retired = Retired::new();
  let mut iter = targets.iter().peekable();
  while let Some(slot) = iter.next() {
    if iter.peek().is_some() {
      if slot.next(value.clone()) == Delivery::Retired {
        retired.push(slot.id());
      }
    } else {
      if slot.next(value) == Delivery::Retired {
        retired.push(slot.id());
      }
      break;
    }
  }
  retired
}

/// Sends the terminal event to every slot of `targets`.
pub(crate) fn broadcast_terminal<Item, Err>(targets: Snapshot<Item, Err>, terminal: Terminal<Err>)
where
  Err: Clone,
{
  let mut iter = targets.into_iter().peekable();
  while let Some(slot) = iter.next() {
    if iter.peek().is_some() {
      slot.terminate(terminal.clone());
    } else {
      slot.terminate(terminal);
      break;
    }
  }
}
