pub mod layout;
mod reader;

#[cfg(test)]
pub mod mock;

pub use reader::{PointerWidth, ReadMemory, decode_pointers};

#[cfg(test)]
pub use mock::{MockLocator, MockMemoryBuilder, MockProcess};
