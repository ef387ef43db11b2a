//! # rxsignal: thread-safe subjects
//!
//! A small push-based event stream library built around two hot producers:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Subject`] | Multicasts events to the observers currently subscribed |
//! | [`ReplaySubject`] | Like `Subject`, and replays recent values to late subscribers |
//! | [`of`] / [`create`] | Cold producers, mostly useful as sources for a subject |
//!
//! Every stream follows the same grammar: any number of values, then at most
//! one terminal event (an error or a completion). Subjects enforce it no
//! matter how many threads are sending.
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//!
//! use rxsignal::prelude::*;
//!
//! let subject = ReplaySubject::<&str, ()>::with_capacity(1);
//! subject.send_next("first");
//! subject.send_next("second");
//!
//! let seen = Arc::new(Mutex::new(vec![]));
//! let c_seen = seen.clone();
//! let sub = subject.subscribe(move |v| c_seen.lock().unwrap().push(v));
//! subject.send_next("third");
//! sub.unsubscribe();
//! subject.send_next("fourth");
//!
//! assert_eq!(*seen.lock().unwrap(), vec!["second", "third"]);
//! ```
//!
//! ## Feature Flags
//!
//! - **`serde`**: `Serialize`/`Deserialize` for [`Capacity`], so a replay
//!   window can be read from configuration.
//!
//! [`Subject`]: subject::Subject
//! [`ReplaySubject`]: subject::ReplaySubject
//! [`Capacity`]: subject::Capacity
//! [`of`]: signal::of
//! [`create`]: signal::create

pub mod error;
pub mod event;
pub mod observer;
pub mod prelude;
pub mod signal;
pub mod subject;
pub mod subscription;

mod util;

pub use prelude::*;
