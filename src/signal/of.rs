use std::marker::PhantomData;

use crate::{observer::Observer, signal::Signal, subscription::Disposable};

/// Creates a signal producing a single value.
///
/// Every subscription synchronously receives `Next(v)` followed by
/// `Completed` before `subscribe` returns, and gets back a subscription that
/// is already closed. Never emits an error.
///
/// The observer runs on the subscribing thread, so a panic in it propagates
/// to the caller of `subscribe`.
///
/// # Examples
///
/// ```
/// use std::convert::Infallible;
///
/// use rxsignal::prelude::*;
///
/// of::<_, Infallible>(123).subscribe(|v| println!("{}", v));
/// ```
pub fn of<Item, Err>(v: Item) -> Of<Item, Err> { Of { value: v, _err: PhantomData } }

pub struct Of<Item, Err> {
  value: Item,
  _err: PhantomData<fn() -> Err>,
}

impl<Item: Clone, Err> Clone for Of<Item, Err> {
  fn clone(&self) -> Self { of(self.value.clone()) }
}

impl<Item: Clone, Err> Signal<Item, Err> for Of<Item, Err> {
  type Unsub = Disposable;

  fn subscribe_with<O>(&self, mut observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    if !observer.is_closed() {
      observer.next(self.value.clone());
      observer.complete();
    }
    Disposable::closed()
  }
}
