//! Client-local state shared by the web and mobile frontends.
//!
//! The server never tracks what a user has read; each client keeps a
//! per-user map of "last seen reply count" per note and derives the
//! unread / recent badges from it. This crate is that bookkeeping,
//! extracted so both frontends (and the tests) agree on the policy.

pub mod feed;
pub mod read_counts;

pub use read_counts::{FileStorage, ReadCountStorage, ReadTracker};
