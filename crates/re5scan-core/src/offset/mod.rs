//! Per-build pointer tables and their resolution.

mod builtin;
mod chain;
mod resolved;
mod table;

pub use chain::*;
pub use resolved::*;
pub use table::*;
