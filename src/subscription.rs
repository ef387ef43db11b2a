//! Cancellation handles returned by `subscribe`.

use std::{
  fmt::{Debug, Formatter},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  },
};

use crate::util::lock;

/// Handle to cancel an active subscription.
///
/// `unsubscribe` stops future delivery only; it never takes back events that
/// were already delivered. Calling it more than once, or from several threads
/// at the same time, has the same effect as calling it once.
pub trait Subscription {
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;

  /// Activates "RAII" behavior for this subscription: `unsubscribe()` is
  /// called as soon as the returned guard goes out of scope.
  ///
  /// **Attention:** if you don't bind the return value to a variable, the
  /// subscription is cancelled immediately.
  fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self>
  where
    Self: Sized,
  {
    SubscriptionGuard(self)
  }
}

/// Type-erased subscription that can cross threads.
pub type BoxedSubscription = Box<dyn Subscription + Send + Sync>;

impl<T: ?Sized + Subscription> Subscription for Box<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

impl<T: ?Sized + Subscription> Subscription for Arc<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

// ============================================================================
// Disposable
// ============================================================================

type ReleaseAction = Box<dyn FnOnce() + Send>;

/// A subscription backed by a release action that runs at most once.
///
/// Clones share the same released flag, so any clone may cancel.
#[derive(Clone)]
pub struct Disposable {
  inner: Arc<DisposableInner>,
}

struct DisposableInner {
  released: AtomicBool,
  action: Mutex<Option<ReleaseAction>>,
}

impl Disposable {
  /// Wraps `action`, to be run on the first `unsubscribe`.
  pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
    Self {
      inner: Arc::new(DisposableInner {
        released: AtomicBool::new(false),
        action: Mutex::new(Some(Box::new(action))),
      }),
    }
  }

  /// A token with nothing left to cancel. It is already closed.
  pub fn closed() -> Self {
    Self {
      inner: Arc::new(DisposableInner { released: AtomicBool::new(true), action: Mutex::new(None) }),
    }
  }
}

impl Subscription for Disposable {
  fn unsubscribe(&self) {
    if self.inner.released.swap(true, Ordering::AcqRel) {
      return;
    }
    let action = lock(&self.inner.action).take();
    if let Some(action) = action {
      action();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.inner.released.load(Ordering::Acquire) }
}

impl Debug for Disposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Disposable")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

// ============================================================================
// SubscriptionGuard
// ============================================================================

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: Subscription>(pub(crate) T);

impl<T: Subscription> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }

  /// The guarded subscription.
  pub fn get(&self) -> &T { &self.0 }
}

impl<T: Subscription> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
