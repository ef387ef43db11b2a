use std::{collections::VecDeque, fmt, str::FromStr};

use crate::error::CapacityError;

/// How many past values a [`ReplaySubject`](super::ReplaySubject) keeps for
/// late subscribers.
///
/// Fixed at construction. `Bounded(0)` keeps no values at all, only the
/// terminal event, which is exactly what a plain [`Subject`](super::Subject)
/// does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Capacity {
  #[default]
  Unlimited,
  Bounded(usize),
}

impl Capacity {
  /// The bound, or `None` when unlimited.
  #[inline]
  pub fn limit(self) -> Option<usize> {
    match self {
      Capacity::Unlimited => None,
      Capacity::Bounded(n) => Some(n),
    }
  }

  #[inline]
  pub fn is_unlimited(self) -> bool { matches!(self, Capacity::Unlimited) }
}

impl From<usize> for Capacity {
  fn from(n: usize) -> Self { Capacity::Bounded(n) }
}

impl TryFrom<i64> for Capacity {
  type Error = CapacityError;

  fn try_from(n: i64) -> Result<Self, Self::Error> {
    if n < 0 {
      return Err(CapacityError::Negative(n));
    }
    usize::try_from(n)
      .map(Capacity::Bounded)
      .map_err(|_| CapacityError::Invalid(n.to_string()))
  }
}

impl FromStr for Capacity {
  type Err = CapacityError;

  /// Accepts `unlimited` (any case) or an integer.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("unlimited") {
      return Ok(Capacity::Unlimited);
    }
    let n: i64 = s
      .parse()
      .map_err(|_| CapacityError::Invalid(s.to_owned()))?;
    Capacity::try_from(n)
  }
}

impl TryFrom<&str> for Capacity {
  type Error = CapacityError;

  #[inline]
  fn try_from(s: &str) -> Result<Self, Self::Error> { s.parse() }
}

impl fmt::Display for Capacity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Capacity::Unlimited => f.write_str("unlimited"),
      Capacity::Bounded(n) => write!(f, "{n}"),
    }
  }
}

/// FIFO window over the most recent values, oldest first.
pub(crate) struct History<Item> {
  capacity: Capacity,
  values: VecDeque<Item>,
}

impl<Item> History<Item> {
  pub(crate) fn new(capacity: Capacity) -> Self { Self { capacity, values: VecDeque::new() } }

  #[inline]
  pub(crate) fn capacity(&self) -> Capacity { self.capacity }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.values.len() }
}

impl<Item: Clone> History<Item> {
  /// Appends a copy of `value`, evicting from the front only as far as needed
  /// to get back within capacity.
  pub(crate) fn record(&mut self, value: &Item) {
    match self.capacity {
      Capacity::Bounded(0) => {}
      Capacity::Bounded(limit) => {
        self.values.push_back(value.clone());
        while self.values.len() > limit {
          self.values.pop_front();
        }
      }
      Capacity::Unlimited => self.values.push_back(value.clone()),
    }
  }

  pub(crate) fn snapshot(&self) -> Vec<Item> { self.values.iter().cloned().collect() }
}
