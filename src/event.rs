//! The message type flowing through every stream.

use crate::observer::Observer;

/// One notification of a stream: a value, a failure, or completion.
///
/// A well-formed stream is zero or more `Next` followed by at most one
/// terminal event (`Error` or `Completed`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event<Item, Err> {
  Next(Item),
  Error(Err),
  Completed,
}

impl<Item, Err> Event<Item, Err> {
  /// `true` for `Error` and `Completed`.
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Event::Next(_)) }

  /// Short name of the variant, used as a log field.
  pub fn kind(&self) -> &'static str {
    match self {
      Event::Next(_) => "next",
      Event::Error(_) => "error",
      Event::Completed => "completed",
    }
  }

  /// Returns the carried value of a `Next` event.
  pub fn into_value(self) -> Option<Item> {
    match self {
      Event::Next(v) => Some(v),
      _ => None,
    }
  }

  /// Returns the cause of an `Error` event.
  pub fn into_error(self) -> Option<Err> {
    match self {
      Event::Error(e) => Some(e),
      _ => None,
    }
  }

  /// Feeds this event into `observer`.
  ///
  /// The observer slot is emptied by a terminal event, so anything delivered
  /// after it through the same slot is dropped.
  pub fn deliver<O>(self, observer: &mut Option<O>)
  where
    O: Observer<Item, Err>,
  {
    match self {
      Event::Next(v) => {
        if let Some(o) = observer.as_mut() {
          o.next(v);
        }
      }
      Event::Error(e) => {
        if let Some(o) = observer.take() {
          o.error(e);
        }
      }
      Event::Completed => {
        if let Some(o) = observer.take() {
          o.complete();
        }
      }
    }
  }
}

/// The terminal event a subject retains once it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Terminal<Err> {
  Error(Err),
  Completed,
}

impl<Err> Terminal<Err> {
  pub(crate) fn kind(&self) -> &'static str {
    match self {
      Terminal::Error(_) => "error",
      Terminal::Completed => "completed",
    }
  }

  pub(crate) fn notify<Item, O>(self, observer: O)
  where
    O: Observer<Item, Err>,
  {
    match self {
      Terminal::Error(e) => observer.error(e),
      Terminal::Completed => observer.complete(),
    }
  }
}
