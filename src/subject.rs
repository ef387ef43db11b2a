//! Hot, multicasting signals.
//!
//! - [`Subject`]: forwards each event to the observers subscribed at the time
//!   it is sent. Late subscribers only get the terminal event.
//! - [`ReplaySubject`]: additionally keeps a bounded window of recent values
//!   and replays it to every new subscriber.
//!
//! Both are thread-safe handles. Cloning a handle shares the underlying
//! subject, and a subject can itself be subscribed to another signal to relay
//! it.

mod history;
mod replay_subject;
mod subject_core;
mod subject_subscription;
mod subscribers;

pub use history::Capacity;
pub use replay_subject::ReplaySubject;
pub use subject_core::Subject;
pub use subject_subscription::SubjectSubscription;
