use std::{
  any::Any,
  sync::{Mutex, MutexGuard, PoisonError},
};

/// Locks `m`, recovering the guard if a previous holder panicked.
#[inline]
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Best-effort text of a caught panic payload, for logging.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    s
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.as_str()
  } else {
    "<non-string panic payload>"
  }
}
