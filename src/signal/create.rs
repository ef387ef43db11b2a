use std::marker::PhantomData;

use crate::{
  observer::{Emitter, Observer},
  signal::Signal,
  subscription::Subscription,
};

/// Creates a signal from a closure that drives each new observer.
///
/// The closure runs once per subscription with an [`Emitter`] wired to that
/// observer, and returns the subscription handed back to the subscriber.
/// Anything emitted after a terminal event is dropped.
///
/// # Examples
///
/// ```
/// use rxsignal::prelude::*;
///
/// let numbers = create(|emitter: &mut dyn Emitter<i32, String>| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
///   Disposable::closed()
/// });
/// numbers.subscribe(|v| println!("{}", v));
/// ```
pub fn create<F, Item, Err, U>(f: F) -> Create<F, Item, Err>
where
  F: Fn(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  Create { f, _marker: PhantomData }
}

#[derive(Clone)]
pub struct Create<F, Item, Err> {
  f: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

/// Forwards to the observer until it sees a terminal event or reports itself
/// closed.
struct CreateEmitter<O>(Option<O>);

impl<O, Item, Err> Emitter<Item, Err> for CreateEmitter<O>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) {
    if let Some(observer) = &mut self.0 {
      if observer.is_closed() {
        self.0 = None;
      } else {
        observer.next(value);
      }
    }
  }

  #[inline]
  fn error(&mut self, err: Err) {
    if let Some(observer) = self.0.take() {
      observer.error(err);
    }
  }

  #[inline]
  fn complete(&mut self) {
    if let Some(observer) = self.0.take() {
      observer.complete();
    }
  }
}

impl<F, Item, Err, U> Signal<Item, Err> for Create<F, Item, Err>
where
  F: Fn(&mut dyn Emitter<Item, Err>) -> U,
  U: Subscription,
{
  type Unsub = U;

  fn subscribe_with<O>(&self, observer: O) -> Self::Unsub
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let mut emitter = CreateEmitter(Some(observer));
    (self.f)(&mut emitter)
  }
}
