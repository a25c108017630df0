//! Watch session orchestration.

mod runner;
mod stats;

pub use runner::WatchSession;
pub use stats::SessionStats;
