use std::{
  fmt::{Debug, Formatter},
  sync::{Arc, Weak},
};

use super::{subject_core::SubjectCore, subscribers::Slot};
use crate::subscription::Subscription;

/// Subscription handle for a [`Subject`](super::Subject) or
/// [`ReplaySubject`](super::ReplaySubject).
///
/// Unsubscribing removes the observer from the subject's active set and
/// drops it. The handle only holds a weak reference to the subject, so it
/// never keeps the subject alive.
///
/// A handle returned by subscribing to an already terminated subject is
/// closed from the start.
pub struct SubjectSubscription<Item, Err> {
  core: Weak<SubjectCore<Item, Err>>,
  slot: Arc<Slot<Item, Err>>,
}

impl<Item, Err> SubjectSubscription<Item, Err> {
  pub(crate) fn new(core: Weak<SubjectCore<Item, Err>>, slot: Arc<Slot<Item, Err>>) -> Self {
    Self { core, slot }
  }

  /// The id the subject knows this subscription by.
  pub fn id(&self) -> usize { self.slot.id() }
}

impl<Item, Err> Clone for SubjectSubscription<Item, Err> {
  fn clone(&self) -> Self { Self { core: self.core.clone(), slot: self.slot.clone() } }
}

impl<Item, Err> Subscription for SubjectSubscription<Item, Err> {
  fn unsubscribe(&self) {
    if !self.slot.close() {
      return;
    }
    if let Some(core) = self.core.upgrade() {
      core.retire(&[self.slot.id()]);
    }
    self.slot.release();
    tracing::trace!(subscription = self.slot.id(), "unsubscribed");
  }

  #[inline]
  fn is_closed(&self) -> bool { self.slot.is_closed() }
}

impl<Item, Err> Debug for SubjectSubscription<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubjectSubscription")
      .field("id", &self.slot.id())
      .field("is_closed", &self.is_closed())
      .finish()
  }
}
