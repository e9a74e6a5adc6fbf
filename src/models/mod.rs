//! Data models for the Transat gateway.
//!
//! Upstream payloads keep the field names of the Transat API so they can be
//! passed through unchanged.

mod download;
mod laundry;
mod restaurant;
mod statistics;

pub use download::*;
pub use laundry::*;
pub use restaurant::*;
pub use statistics::*;
