//! CLI command implementations.

pub mod identify;
pub mod status;
pub mod watch;
