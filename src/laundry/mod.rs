//! Laundry machine tracking.
//!
//! [`countdown`] holds the pure tick and progress logic; [`poller`] owns the
//! state and the timers that drive it.

pub mod countdown;
mod poller;

pub use poller::*;
