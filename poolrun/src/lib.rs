//! Poolrun - run batches of worker processes with bounded concurrency.
//!
//! Given a list of not-yet-started commands and a pool size, the
//! launcher starts them incrementally so that at most `pool_size` run
//! at any one time, waits for all of them to finish, and reports the
//! first failure in submission order.
//!
//! The launcher deliberately does not collect worker output, schedule
//! by priority, resize the pool, or cancel running workers on failure:
//! it is admission control plus a join barrier, nothing more.

pub mod cli;
pub mod error;
pub mod layout;
pub mod process;

pub use error::LaunchError;
pub use layout::best_tile_layout;
pub use process::{PoolLauncher, ProcessState, WatchedProcess, WorkUnit};
