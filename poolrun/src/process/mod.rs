//! Process pool launching with bounded concurrency.
//!
//! This module provides the core of the crate: configure a batch of
//! [`WorkUnit`]s, hand them to a [`PoolLauncher`], and block until all
//! of them have run to completion.

mod launcher;
mod unit;
mod watch;

pub use launcher::{PoolLauncher, DEFAULT_POLL_INTERVAL};
pub use unit::WorkUnit;
pub use watch::{ProcessState, WatchedProcess};
