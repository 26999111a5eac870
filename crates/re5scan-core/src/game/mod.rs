mod field;
mod snapshot;

pub use field::*;
pub use snapshot::*;
