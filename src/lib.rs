//! scss-watch - Recompile SCSS with source maps whenever sources change.

pub mod compiler;
pub mod config;
pub mod display;
pub mod session;
pub mod watcher;
