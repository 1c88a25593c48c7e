//! CLI command implementations.

pub mod watch;
